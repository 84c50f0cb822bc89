use std::fmt::Display;

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum FlushType {
    ScheduledInterval,
    Limit,
    Manual,
    Shutdown,
}

impl Display for FlushType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FlushType::ScheduledInterval => "scheduled:interval",
            FlushType::Limit => "limit",
            FlushType::Manual => "manual",
            FlushType::Shutdown => "shutdown",
        }
        .fmt(f)
    }
}
