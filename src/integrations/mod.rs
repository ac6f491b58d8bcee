//! Outbound collaborators: the AI script endpoint, the weather provider and
//! the image bucket.

pub mod ai;
pub mod storage;
pub mod weather;
