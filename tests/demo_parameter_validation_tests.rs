#[cfg(test)]
mod tests {
    use glob::glob;
    use pendulum_renderer::pendulum::render::DoublePendulumParams;
    use std::fs;

    /// Every parameter file shipped in `demos/` must parse into
    /// `DoublePendulumParams` and pass eager validation, so that a user
    /// starting from any of them gets a working run.
    #[test]
    fn test_ensure_all_demo_files_can_be_parsed() {
        let mut file_count = 0;
        for entry in glob("demos/**/*.json").expect("Failed to read glob pattern") {
            let path = entry.expect("Failed to read path");
            let content = fs::read_to_string(&path)
                .unwrap_or_else(|_| panic!("Failed to read file: {:?}", path));

            let params: DoublePendulumParams = serde_json::from_str(&content).unwrap_or_else(
                |err| panic!("Failed to parse JSON file: {:?}\n\n{:?}\n", path, err),
            );

            params
                .physics
                .validate()
                .unwrap_or_else(|err| panic!("Bad physics in {:?}: {}", path, err));
            params
                .time_grid
                .validate()
                .unwrap_or_else(|err| panic!("Bad time grid in {:?}: {}", path, err));

            file_count += 1;
        }
        assert!(file_count > 0, "no demo parameter files found");
    }
}
