//! Pure derived computations over a task snapshot. Nothing in here mutates
//! the collection; views take `&[Task]` plus a view parameter and return
//! owned results.

pub mod calendar;
pub mod search;
pub mod week;
