mod common;
mod explainer;
mod scoring;
