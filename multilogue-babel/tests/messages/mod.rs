mod append;
mod mapping;
