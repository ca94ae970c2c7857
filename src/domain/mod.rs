pub mod feedback;
pub mod news;
pub mod report;
pub mod stats;
pub mod tdp;
