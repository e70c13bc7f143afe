mod job;
mod runner;

pub use self::job::discover;
pub use self::runner::compare_all;
