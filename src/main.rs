mod app;
mod config;
mod library;
mod map;
mod metadata;
mod preview;
mod runtime;
mod tree;
mod ui;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    runtime::run()
}
