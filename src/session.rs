//! Interactive menu of the symptom checker.
//!
//! The login state lives in an explicit [`Session`] value threaded through
//! [`Controller::step`]; each menu action receives the session it runs in
//! and returns the next one.

use std::io::{BufRead, Write};

use chrono::Local;
use compute::predict_for_date_of_birth;
use model::entities::{IllnessLevel, NewUser, Symptom, UserProfile};
use model::{AccountRepository, IllnessTable, SymptomCatalog};
use tracing::{debug, info, instrument, trace, warn};

use crate::config::AppConfig;
use crate::error::AppError;
use crate::report;
use crate::terminal::Terminal;

/// Login state of the menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Session {
    LoggedOut,
    LoggedIn(UserProfile),
    Terminated,
}

impl Session {
    pub fn user(&self) -> Option<&UserProfile> {
        match self {
            Session::LoggedIn(user) => Some(user),
            _ => None,
        }
    }

    pub fn is_terminated(&self) -> bool {
        matches!(self, Session::Terminated)
    }
}

/// Menu entries, numbered as shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Register,
    Login,
    CheckSymptoms,
    Visualize,
    Exit,
}

impl MenuChoice {
    /// Parses a menu selection; options 3 and 4 exist only while logged in.
    ///
    /// The input must match an option exactly, surrounding whitespace included.
    pub fn parse(input: &str, session: &Session) -> Option<Self> {
        let logged_in = session.user().is_some();
        match input {
            "1" => Some(MenuChoice::Register),
            "2" => Some(MenuChoice::Login),
            "3" if logged_in => Some(MenuChoice::CheckSymptoms),
            "4" if logged_in => Some(MenuChoice::Visualize),
            "5" => Some(MenuChoice::Exit),
            _ => None,
        }
    }
}

/// Result of one symptom check.
#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    pub age: i64,
    pub symptom: Symptom,
    pub illness_level: IllnessLevel,
}

pub struct Controller<R, W> {
    accounts: Box<dyn AccountRepository>,
    config: AppConfig,
    terminal: Terminal<R, W>,
}

impl<R: BufRead, W: Write> Controller<R, W> {
    pub fn new(accounts: Box<dyn AccountRepository>, config: AppConfig, terminal: Terminal<R, W>) -> Self {
        Self {
            accounts,
            config,
            terminal,
        }
    }

    pub fn terminal(&self) -> &Terminal<R, W> {
        &self.terminal
    }

    /// Runs the menu until the user exits or the input ends.
    pub fn run(&mut self) -> Result<(), AppError> {
        info!("Menu session started");
        let mut session = Session::LoggedOut;

        while !session.is_terminated() {
            self.show_menu(&session)?;
            session = match self.terminal.prompt("Enter your choice: ")? {
                Some(input) => match self.step(session, &input) {
                    Ok(next) => next,
                    Err(AppError::InputClosed) => Session::Terminated,
                    Err(e) => return Err(e),
                },
                None => {
                    debug!("Input closed at the main menu");
                    self.terminal.say("")?;
                    Session::Terminated
                }
            };
        }

        info!("Menu session finished");
        Ok(())
    }

    /// Performs the menu action selected by `input` and returns the next session.
    ///
    /// Failed actions are reported on the terminal and leave the session
    /// unchanged, except a failed login, which logs the user out. Only
    /// terminal failures are returned as errors.
    pub fn step(&mut self, session: Session, input: &str) -> Result<Session, AppError> {
        let Some(choice) = MenuChoice::parse(input, &session) else {
            debug!("Rejected menu input {:?}", input);
            self.terminal.say("Invalid choice. Please try again.")?;
            return Ok(session);
        };
        trace!(?choice, "Menu choice");

        let outcome = match choice {
            MenuChoice::Register => self.register().map(|_| None),
            MenuChoice::Login => self.login().map(|user| Some(Session::LoggedIn(user))),
            MenuChoice::CheckSymptoms => match session.user() {
                Some(user) => self.check_symptoms(user).map(|_| None),
                None => Ok(None),
            },
            MenuChoice::Visualize => self.visualize().map(|_| None),
            MenuChoice::Exit => {
                self.terminal.say("Goodbye!")?;
                return Ok(Session::Terminated);
            }
        };

        match outcome {
            Ok(Some(next)) => Ok(next),
            Ok(None) => Ok(session),
            Err(e) if e.is_fatal() => Err(e),
            Err(e) => {
                warn!(?choice, error = %e, "Menu action failed");
                self.terminal.say(e.user_message())?;
                Ok(match choice {
                    MenuChoice::Login => Session::LoggedOut,
                    _ => session,
                })
            }
        }
    }

    fn show_menu(&mut self, session: &Session) -> Result<(), AppError> {
        self.terminal.say("\n=== Health Symptom Analyzer ===")?;
        self.terminal.say("1. Register")?;
        self.terminal.say("2. Login")?;
        if session.user().is_some() {
            self.terminal.say("3. Check Symptoms")?;
            self.terminal.say("4. View Data Visualizations")?;
        }
        self.terminal.say("5. Exit")?;
        Ok(())
    }

    fn ask(&mut self, prompt: &str) -> Result<String, AppError> {
        self.terminal.prompt(prompt)?.ok_or(AppError::InputClosed)
    }

    fn ask_password(&mut self, prompt: &str) -> Result<String, AppError> {
        self.terminal
            .prompt_password(prompt)?
            .ok_or(AppError::InputClosed)
    }

    /// Registers a new user. The username is checked before the other fields are asked for.
    pub fn register(&mut self) -> Result<UserProfile, AppError> {
        self.terminal.say("\n--- Registration ---")?;
        let username = self.ask("Enter username: ")?;
        if self.accounts.exists(&username)? {
            return Err(model::ModelError::DuplicateUser(username).into());
        }

        let name = self.ask("Enter your full name: ")?;
        let date_of_birth = self.ask("Enter your date of birth (YYYY-MM-DD): ")?;
        let password = self.ask_password("Enter password: ")?;

        let user = self
            .accounts
            .register(NewUser::new(username, name, date_of_birth, password))?;
        self.terminal.say("Registration successful!")?;
        Ok(user.into())
    }

    pub fn login(&mut self) -> Result<UserProfile, AppError> {
        self.terminal.say("\n--- Login ---")?;
        let username = self.ask("Username: ")?;
        let password = self.ask_password("Password: ")?;

        let user: UserProfile = self.accounts.authenticate(&username, &password)?.into();
        self.terminal.say(format!("Welcome back, {}!", user.name))?;
        Ok(user)
    }

    /// Lets the user pick a symptom and predicts an illness level for it.
    #[instrument(skip(self, user), fields(username = %user.username))]
    pub fn check_symptoms(&mut self, user: &UserProfile) -> Result<Analysis, AppError> {
        self.terminal.say("\n--- Symptom Checker ---")?;
        let catalog = SymptomCatalog::load(&self.config.symptoms_file)?;
        if catalog.is_empty() {
            return Err(AppError::InvalidInput("No symptoms available!".to_string()));
        }

        self.terminal.say("Available symptoms:")?;
        for (i, symptom) in catalog.symptoms().iter().enumerate() {
            self.terminal
                .say(format!("{}. {} ({})", i + 1, symptom.symptom, symptom.intensity))?;
        }

        let raw = self.ask("Enter the number of your symptom: ")?;
        let position: i64 = raw
            .trim()
            .parse()
            .map_err(|_| AppError::InvalidInput("Please enter a valid number!".to_string()))?;
        let symptom = usize::try_from(position)
            .ok()
            .and_then(|position| catalog.choose(position))
            .cloned()
            .ok_or_else(|| AppError::InvalidInput("Invalid choice!".to_string()))?;
        debug!(position, symptom = %symptom.symptom, "Symptom selected");

        let training_set = IllnessTable::load(&self.config.illness_file)?.training_set()?;
        let (age, illness_level) = predict_for_date_of_birth(
            &user.date_of_birth,
            Local::now().date_naive(),
            symptom.severity,
            &training_set,
            &self.config.model,
        )?;

        let analysis = Analysis {
            age,
            symptom,
            illness_level,
        };
        self.print_analysis(&analysis)?;
        Ok(analysis)
    }

    fn print_analysis(&mut self, analysis: &Analysis) -> Result<(), AppError> {
        self.terminal.say("\n--- Analysis ---")?;
        self.terminal.say(format!("Age: {} years", analysis.age))?;
        self.terminal.say(format!(
            "Symptom: {} ({})",
            analysis.symptom.symptom, analysis.symptom.intensity
        ))?;
        self.terminal
            .say(format!("Predicted illness level: {}/5", analysis.illness_level))?;
        self.terminal.say("(1 = least severe, 5 = most severe)")?;
        Ok(())
    }

    /// Renders the chart dashboard and tries to show it.
    pub fn visualize(&mut self) -> Result<(), AppError> {
        self.terminal.say("\nGenerating visualizations...")?;
        report::generate(&self.config.illness_file, &self.config.chart_file)?;
        self.terminal.say(format!(
            "Visualizations saved as '{}'",
            self.config.chart_file.display()
        ))?;

        if self.config.display_charts {
            report::try_display(&self.config.chart_file);
        }
        Ok(())
    }
}
