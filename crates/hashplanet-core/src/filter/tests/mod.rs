mod tests_path;
