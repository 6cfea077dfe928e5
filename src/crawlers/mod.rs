pub mod extract;
pub mod indexer;

pub use extract::extract_content;
pub use indexer::NavigationIndexer;

#[cfg(test)]
mod tests;
