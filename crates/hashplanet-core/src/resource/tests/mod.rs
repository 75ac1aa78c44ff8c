mod tests_npm;
