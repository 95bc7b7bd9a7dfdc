mod fixtures;
mod interface_test;
