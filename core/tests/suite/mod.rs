mod analyze;
mod stream;
