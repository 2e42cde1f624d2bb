#[cfg(test)]
mod integration_tests {
    use std::fs;

    use model::InMemoryAccountStore;

    use crate::test_utils::test_utils::{TestEnv, date_of_birth_for_age, register_and_login};

    fn script(parts: &[&[&str]]) -> Vec<String> {
        parts
            .iter()
            .flat_map(|part| part.iter().map(|line| line.to_string()))
            .collect()
    }

    #[test]
    fn test_symptom_check_end_to_end() {
        let env = TestEnv::new();
        let mut lines = register_and_login("alice", "Alice Doe", 40, "s3cret");
        lines.extend(["3", "3", "5"].map(String::from));

        let output = env.run_menu(&lines);

        assert!(output.contains("Registration successful!"));
        assert!(output.contains("Welcome back, Alice Doe!"));
        assert!(output.contains("3. fever (high)"));
        assert!(output.contains("--- Analysis ---"));
        assert!(output.contains("Age: 40 years"));
        assert!(output.contains("Symptom: fever (high)"));
        assert!(output.contains("Predicted illness level: 3/5"));
        assert!(output.contains("(1 = least severe, 5 = most severe)"));
        assert!(output.trim_end().ends_with("Goodbye!"));
    }

    #[test]
    fn test_registration_stores_row_verbatim() {
        let env = TestEnv::new();
        let output = env.run_menu(&["1", "bob", "Bob Smith", "1985-02-03", "0123", "5"]);

        assert!(output.contains("--- Registration ---"));
        assert!(output.contains("Registration successful!"));
        assert_eq!(env.user_rows(), vec!["bob,Bob Smith,1985-02-03,0123".to_string()]);
    }

    #[test]
    fn test_duplicate_registration_is_rejected_before_other_prompts() {
        let env = TestEnv::new();
        let output = env.run_menu(&[
            "1", "bob", "Bob Smith", "1985-02-03", "pw", // first registration
            "1", "bob", // duplicate, no further prompts
            "5",
        ]);

        assert!(output.contains("Username already exists!"));
        assert_eq!(output.matches("Registration successful!").count(), 1);
        assert_eq!(output.matches("Enter your full name: ").count(), 1);
        assert_eq!(env.user_rows().len(), 1);
    }

    #[test]
    fn test_login_failure_messages() {
        let env = TestEnv::new();
        let output = env.run_menu(&[
            "1", "bob", "Bob Smith", "1985-02-03", "pw", //
            "2", "bob", "wrong", //
            "2", "nobody", "pw", //
            "5",
        ]);

        assert_eq!(output.matches("Invalid username or password!").count(), 2);
        assert!(!output.contains("Welcome back"));
        assert!(!output.contains("3. Check Symptoms"));
    }

    #[test]
    fn test_failed_login_logs_the_user_out() {
        let env = TestEnv::new();
        let mut lines = register_and_login("alice", "Alice Doe", 30, "pw");
        lines.extend(["2", "alice", "not-the-password", "3", "5"].map(String::from));

        let output = env.run_menu(&lines);

        assert!(output.contains("Welcome back, Alice Doe!"));
        assert!(output.contains("Invalid username or password!"));
        // Option 3 is rejected after the failed login.
        assert!(output.contains("Invalid choice. Please try again."));
        assert!(!output.contains("--- Symptom Checker ---"));
    }

    #[test]
    fn test_logged_out_menu_hides_member_options() {
        let env = TestEnv::new();
        let output = env.run_menu(&["3", "4", "9", "5"]);

        assert!(!output.contains("3. Check Symptoms"));
        assert!(!output.contains("4. View Data Visualizations"));
        assert_eq!(output.matches("Invalid choice. Please try again.").count(), 3);
        assert!(!output.contains("Generating visualizations"));
    }

    #[test]
    fn test_logged_in_menu_shows_member_options() {
        let env = TestEnv::new();
        let mut lines = register_and_login("alice", "Alice Doe", 30, "pw");
        lines.push("5".to_string());

        let output = env.run_menu(&lines);
        assert!(output.contains("3. Check Symptoms"));
        assert!(output.contains("4. View Data Visualizations"));
    }

    #[test]
    fn test_invalid_symptom_selection_skips_prediction() {
        let env = TestEnv::new();
        let mut lines = register_and_login("alice", "Alice Doe", 40, "pw");
        lines.extend(["3", "9", "3", "0", "3", "fever", "5"].map(String::from));

        let output = env.run_menu(&lines);

        assert_eq!(output.matches("Invalid choice!").count(), 2);
        assert!(output.contains("Please enter a valid number!"));
        assert!(!output.contains("--- Analysis ---"));
        assert!(!output.contains("Predicted illness level"));
    }

    #[test]
    fn test_missing_symptom_catalog_is_reported() {
        let env = TestEnv::new();
        fs::remove_file(&env.config.symptoms_file).unwrap();
        let mut lines = register_and_login("alice", "Alice Doe", 40, "pw");
        lines.extend(["3", "5"].map(String::from));

        let output = env.run_menu(&lines);
        assert!(output.contains("Data file not found:"));
        assert!(output.contains("Goodbye!"));
    }

    #[test]
    fn test_empty_symptom_catalog_is_reported() {
        let env = TestEnv::new();
        fs::write(&env.config.symptoms_file, "symptom,intensity,severity\n").unwrap();
        let mut lines = register_and_login("alice", "Alice Doe", 40, "pw");
        lines.extend(["3", "5"].map(String::from));

        let output = env.run_menu(&lines);
        assert!(output.contains("No symptoms available!"));
        assert!(!output.contains("Enter the number of your symptom: "));
        assert!(output.contains("Goodbye!"));
    }

    #[test]
    fn test_padded_menu_input_is_rejected() {
        let env = TestEnv::new();
        let output = env.run_menu(&[" 1", "2 ", " 5 ", "5"]);

        assert_eq!(output.matches("Invalid choice. Please try again.").count(), 3);
        assert!(!output.contains("--- Registration ---"));
        assert!(!output.contains("--- Login ---"));
        assert_eq!(output.matches("Goodbye!").count(), 1);
    }

    #[test]
    fn test_unparseable_date_of_birth_is_reported() {
        let env = TestEnv::new();
        let output = env.run_menu(&script(&[
            &["1", "carol", "Carol", "19/04/1990", "pw"],
            &["2", "carol", "pw"],
            &["3", "3", "5"],
        ]));

        assert!(output.contains("is not a valid YYYY-MM-DD date!"));
        assert!(!output.contains("--- Analysis ---"));
    }

    #[test]
    fn test_visualization_is_written() {
        let env = TestEnv::new();
        let mut lines = register_and_login("alice", "Alice Doe", 40, "pw");
        lines.extend(["4", "5"].map(String::from));

        let output = env.run_menu(&lines);

        assert!(output.contains("Generating visualizations..."));
        assert!(output.contains("Visualizations saved as"));
        let svg = fs::read_to_string(&env.config.chart_file).unwrap();
        assert!(svg.contains("Age vs Illness Level"));
    }

    #[test]
    fn test_visualization_reports_missing_column() {
        let env = TestEnv::with_illness_table(
            "symptom_name,symptom_intensity,symptom_severity,age,illness_level\nfever,high,4,40,3\n",
        );
        let mut lines = register_and_login("alice", "Alice Doe", 40, "pw");
        lines.extend(["4", "5"].map(String::from));

        let output = env.run_menu(&lines);

        assert!(output.contains("Missing column: date"));
        assert!(!output.contains("Visualizations saved as"));
        assert!(!env.config.chart_file.exists());
    }

    #[test]
    fn test_end_of_input_ends_the_session() {
        let env = TestEnv::new();
        let output = env.run_menu(&["1", "dave"]);

        assert!(output.contains("Enter your full name: "));
        assert!(env.user_rows().is_empty());
        assert!(!output.contains("Goodbye!"));
    }

    #[test]
    fn test_menu_with_in_memory_accounts() {
        let env = TestEnv::new();
        let date_of_birth = date_of_birth_for_age(40);
        let lines = script(&[
            &["1", "erin", "Erin", date_of_birth.as_str(), "pw"],
            &["2", "erin", "pw"],
            &["3", "3", "5"],
        ]);

        let output = env.run_menu_with(Box::new(InMemoryAccountStore::new()), &lines);

        assert!(output.contains("Predicted illness level: 3/5"));
        // The CSV store was never touched.
        assert!(env.user_rows().is_empty());
    }
}
