mod manager;
mod test_utils;
