pub mod dashboard;
pub mod dreams;
pub mod interpret;
pub mod persons;
pub mod tags;

#[cfg(test)]
mod tests;
