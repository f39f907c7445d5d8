pub mod storyteller;
