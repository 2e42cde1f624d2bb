#[cfg(test)]
pub mod test_utils {
    use std::fs;
    use std::io::Cursor;
    use std::path::{Path, PathBuf};

    use chrono::{Local, Months};
    use model::{AccountRepository, CsvAccountStore};
    use tempfile::TempDir;
    use tracing::Level;
    use tracing_subscriber::FmtSubscriber;

    use crate::config::AppConfig;
    use crate::session::Controller;
    use crate::terminal::Terminal;

    pub const SYMPTOMS_CSV: &str = "symptom,intensity,severity
headache,mild,1
cough,moderate,2
fever,high,4
chest pain,severe,5
";

    /// Illness table dominated by severity 4 rows labeled level 3.
    pub const ILLNESS_CSV: &str = "date,symptom_name,symptom_intensity,symptom_severity,age,illness_level
2024-01-01,headache,mild,1,20,1
2024-01-01,headache,mild,1,30,1
2024-01-02,headache,mild,1,50,1
2024-01-02,headache,mild,1,60,1
2024-01-02,cough,moderate,2,25,2
2024-01-03,cough,moderate,2,35,2
2024-01-03,cough,moderate,2,45,2
2024-01-04,cough,moderate,2,55,2
2024-01-01,fever,high,4,20,3
2024-01-01,fever,high,4,30,3
2024-01-02,fever,high,4,40,3
2024-01-02,fever,high,4,40,3
2024-01-03,fever,high,4,40,3
2024-01-03,fever,high,4,40,3
2024-01-04,fever,high,4,40,3
2024-01-04,fever,high,4,40,3
2024-01-05,fever,high,4,50,3
2024-01-05,fever,high,4,60,3
2024-01-05,fever,high,4,65,3
2024-01-03,chest pain,severe,5,30,5
2024-01-04,chest pain,severe,5,45,5
2024-01-05,chest pain,severe,5,70,5
";

    pub fn write_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, contents).expect("Failed to write test data file");
        path
    }

    /// A date of birth that makes the user exactly `age` years old today.
    pub fn date_of_birth_for_age(age: u32) -> String {
        Local::now()
            .date_naive()
            .checked_sub_months(Months::new(age * 12))
            .expect("Date of birth out of range")
            .format("%Y-%m-%d")
            .to_string()
    }

    /// Menu input that registers `username` and logs in as that user.
    pub fn register_and_login(username: &str, name: &str, age: u32, password: &str) -> Vec<String> {
        vec![
            "1".to_string(),
            username.to_string(),
            name.to_string(),
            date_of_birth_for_age(age),
            password.to_string(),
            "2".to_string(),
            username.to_string(),
            password.to_string(),
        ]
    }

    /// A temporary working directory with the reference tables and an empty users file.
    pub struct TestEnv {
        pub dir: TempDir,
        pub config: AppConfig,
    }

    impl TestEnv {
        pub fn new() -> Self {
            Self::with_illness_table(ILLNESS_CSV)
        }

        pub fn with_illness_table(illness_csv: &str) -> Self {
            let _guard = init_test_tracing();
            let dir = tempfile::tempdir().expect("Failed to create temp dir");

            let config = AppConfig {
                users_file: dir.path().join("users.csv"),
                symptoms_file: write_file(dir.path(), "symptoms.csv", SYMPTOMS_CSV),
                illness_file: write_file(dir.path(), "illness.csv", illness_csv),
                chart_file: dir.path().join("enhanced_illness_visualization.svg"),
                display_charts: false,
                mask_passwords: false,
                ..AppConfig::default()
            };
            CsvAccountStore::open_or_create(&config.users_file)
                .expect("Failed to create users file");

            Self { dir, config }
        }

        /// Feeds `lines` to the menu and returns everything it printed.
        pub fn run_menu<S: AsRef<str>>(&self, lines: &[S]) -> String {
            let store = CsvAccountStore::new(&self.config.users_file);
            self.run_menu_with(Box::new(store), lines)
        }

        pub fn run_menu_with<S: AsRef<str>>(
            &self,
            accounts: Box<dyn AccountRepository>,
            lines: &[S],
        ) -> String {
            let _guard = init_test_tracing();
            let script: String = lines
                .iter()
                .map(|line| format!("{}\n", line.as_ref()))
                .collect();

            let terminal = Terminal::new(Cursor::new(script.into_bytes()), Vec::new(), false);
            let mut controller = Controller::new(accounts, self.config.clone(), terminal);
            controller.run().expect("Menu session failed");

            String::from_utf8_lossy(controller.terminal().output()).into_owned()
        }

        /// Stored user rows, without the header.
        pub fn user_rows(&self) -> Vec<String> {
            fs::read_to_string(&self.config.users_file)
                .expect("Failed to read users file")
                .lines()
                .skip(1)
                .map(str::to_string)
                .collect()
        }
    }

    /// Initialize tracing for tests with output to STDERR.
    ///
    /// The log level is taken from RUST_LOG, defaulting to WARN.
    pub fn init_test_tracing() -> tracing::subscriber::DefaultGuard {
        let log_level = std::env::var("RUST_LOG")
            .ok()
            .and_then(|level| match level.to_uppercase().as_str() {
                "ERROR" => Some(Level::ERROR),
                "WARN" => Some(Level::WARN),
                "INFO" => Some(Level::INFO),
                "DEBUG" => Some(Level::DEBUG),
                "TRACE" => Some(Level::TRACE),
                _ => None,
            })
            .unwrap_or(Level::WARN);

        let subscriber = FmtSubscriber::builder()
            .with_max_level(log_level)
            .with_writer(std::io::stderr)
            .finish();
        tracing::subscriber::set_default(subscriber)
    }
}
