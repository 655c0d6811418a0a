mod common;
mod progress;
mod scenarios;
mod summary;
