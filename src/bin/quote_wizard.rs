//! Interactive terminal client walking through the quote wizard and
//! submitting the request to a running quote service.

use std::io::{self, BufRead, Write};
use std::path::Path;

use clap::Parser;
use dotenvy::dotenv;

use m2_studio::domain::attachment::Attachment;
use m2_studio::domain::form_values::FieldValue;
use m2_studio::domain::project_type::ProjectType;
use m2_studio::domain::wizard::{FieldKind, FieldOption, WizardField, format_number};
use m2_studio::wizard::http::HttpQuoteSubmitter;
use m2_studio::wizard::{Advance, QuoteWizard, WizardError, WizardPhase};

#[derive(Debug, Parser)]
#[command(name = "quote-wizard", version, about = "Request a quote from the M² studio")]
struct Cli {
    /// Quote endpoint of the running service
    #[arg(
        long,
        env = "QUOTE_ENDPOINT",
        default_value = "http://127.0.0.1:8080/api/quote"
    )]
    endpoint: String,

    /// Skip the picker and start with this project type
    #[arg(long)]
    project_type: Option<String>,
}

/// What the visitor wants after filling a step.
enum StepAction {
    Next,
    Back,
    Quit,
}

struct Terminal<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Terminal<R, W> {
    /// Prints `prompt` and reads one trimmed line. `None` on end of input.
    fn ask(&mut self, prompt: &str) -> io::Result<Option<String>> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn say(&mut self, message: &str) -> io::Result<()> {
        writeln!(self.output, "{message}")
    }

    fn choose_project_type(&mut self) -> io::Result<Option<ProjectType>> {
        self.say("\nIzaberite tip projekta:")?;
        for (index, project_type) in ProjectType::ALL.iter().enumerate() {
            self.say(&format!("  {}) {}", index + 1, project_type.label()))?;
        }
        loop {
            let Some(answer) = self.ask("Izbor (q za izlaz): ")? else {
                return Ok(None);
            };
            if answer.eq_ignore_ascii_case("q") {
                return Ok(None);
            }
            let by_index = answer
                .parse::<usize>()
                .ok()
                .and_then(|n| n.checked_sub(1))
                .and_then(|n| ProjectType::ALL.get(n).copied());
            match by_index.or_else(|| answer.parse().ok()) {
                Some(project_type) => return Ok(Some(project_type)),
                None => self.say("Nepoznat izbor.")?,
            }
        }
    }

    fn fill_field(&mut self, wizard: &mut QuoteWizard, field: &WizardField) -> io::Result<()> {
        let marker = if field.required { " *" } else { "" };
        self.say(&format!("\n{}{marker}", field.label))?;
        if let Some(help_text) = field.help_text {
            self.say(help_text)?;
        }
        if let Some(error) = wizard.errors().get(field.id) {
            self.say(&format!("! {error}"))?;
        }

        match field.kind {
            FieldKind::File => return self.fill_files(wizard, field),
            FieldKind::Select { options } | FieldKind::Radio { options } => {
                self.list_options(options)?;
                let Some(answer) = self.ask(&hint(wizard, field, ""))? else {
                    return Ok(());
                };
                if let Some(option) = pick_option(options, &answer) {
                    set_value(wizard, field, option.value.into());
                }
            }
            FieldKind::Checkbox { options } => {
                self.list_options(options)?;
                let Some(answer) = self.ask("Brojevi odvojeni zarezom: ")? else {
                    return Ok(());
                };
                if !answer.is_empty() {
                    let choices: Vec<String> = answer
                        .split(',')
                        .filter_map(|part| pick_option(options, part.trim()))
                        .map(|option| option.value.to_string())
                        .collect();
                    set_value(wizard, field, FieldValue::Choices(choices));
                }
            }
            FieldKind::Number { min, max } => {
                let range = match (min, max) {
                    (Some(min), Some(max)) => format!(
                        " ({}-{})",
                        format_number(min.value()),
                        format_number(max.value())
                    ),
                    _ => String::new(),
                };
                let Some(answer) = self.ask(&hint(wizard, field, &range))? else {
                    return Ok(());
                };
                if !answer.is_empty() {
                    let value = match answer.replace(',', ".").parse::<f64>() {
                        Ok(number) => FieldValue::Number(number),
                        Err(_) => FieldValue::Text(answer),
                    };
                    set_value(wizard, field, value);
                }
            }
            FieldKind::Text | FieldKind::Email | FieldKind::Textarea | FieldKind::Date => {
                let Some(answer) = self.ask(&hint(wizard, field, ""))? else {
                    return Ok(());
                };
                if !answer.is_empty() {
                    set_value(wizard, field, FieldValue::Text(answer));
                }
            }
        }
        Ok(())
    }

    fn fill_files(&mut self, wizard: &mut QuoteWizard, field: &WizardField) -> io::Result<()> {
        let count = wizard.values().files(field.id).len();
        if count > 0 {
            self.say(&format!("Priloženo fajlova: {count}"))?;
        }
        loop {
            let Some(answer) = self.ask("Putanja do fajla (Enter za kraj): ")? else {
                return Ok(());
            };
            if answer.is_empty() {
                return Ok(());
            }
            match Attachment::from_path(Path::new(&answer)) {
                Ok(attachment) => match wizard.add_file(field.id, attachment) {
                    Ok(()) => self.say("Fajl dodat.")?,
                    Err(err) => self.say(&err.to_string())?,
                },
                Err(err) => self.say(&format!("Fajl nije moguće pročitati: {err}"))?,
            }
        }
    }

    fn list_options(&mut self, options: &[FieldOption]) -> io::Result<()> {
        for (index, option) in options.iter().enumerate() {
            self.say(&format!("  {}) {}", index + 1, option.label))?;
        }
        Ok(())
    }

    fn step_action(&mut self, is_last: bool) -> io::Result<StepAction> {
        let next = if is_last { "pošalji" } else { "dalje" };
        let answer = self.ask(&format!("\nEnter = {next}, b = nazad, q = izlaz: "))?;
        Ok(match answer.as_deref() {
            None | Some("q") | Some("Q") => StepAction::Quit,
            Some("b") | Some("B") => StepAction::Back,
            Some(_) => StepAction::Next,
        })
    }
}

/// Prompt showing the current value or placeholder; Enter keeps it.
fn hint(wizard: &QuoteWizard, field: &WizardField, suffix: &str) -> String {
    let current = wizard.values().get(field.id).and_then(|value| match value {
        FieldValue::Text(text) => Some(text.clone()),
        FieldValue::Number(number) => Some(format_number(*number)),
        _ => None,
    });
    match (current, field.placeholder) {
        (Some(current), _) => format!("[{current}]{suffix}: "),
        (None, Some(placeholder)) => format!("({placeholder}){suffix}: "),
        (None, None) => format!("{suffix}> "),
    }
}

fn pick_option(options: &'static [FieldOption], answer: &str) -> Option<&'static FieldOption> {
    answer
        .parse::<usize>()
        .ok()
        .and_then(|n| n.checked_sub(1))
        .and_then(|n| options.get(n))
        .or_else(|| options.iter().find(|option| option.value == answer))
}

fn set_value(wizard: &mut QuoteWizard, field: &WizardField, value: FieldValue) {
    if let Err(err) = wizard.set_field_value(field.id, value) {
        log::error!("Cannot set {}: {err}", field.id);
    }
}

async fn run<R: BufRead, W: Write>(
    terminal: &mut Terminal<R, W>,
    submitter: &HttpQuoteSubmitter,
    preselected: Option<ProjectType>,
) -> io::Result<()> {
    let mut wizard = QuoteWizard::new();
    if let Some(project_type) = preselected {
        wizard.select_project_type(project_type);
    }

    loop {
        match wizard.phase() {
            WizardPhase::TypeSelection => match terminal.choose_project_type()? {
                Some(project_type) => wizard.select_project_type(project_type),
                None => return Ok(()),
            },
            WizardPhase::Step(index) => {
                let Some(step) = wizard.current_step() else {
                    return Ok(());
                };
                terminal.say(&format!(
                    "\n== Korak {}/{}: {} ==",
                    index + 1,
                    wizard.steps().len(),
                    step.title
                ))?;
                for field in step.fields {
                    terminal.fill_field(&mut wizard, field)?;
                }

                match terminal.step_action(wizard.is_last_step())? {
                    StepAction::Quit => return Ok(()),
                    StepAction::Back => wizard.back(),
                    StepAction::Next => match wizard.advance(submitter).await {
                        Ok(Advance::Moved(_)) => {}
                        Ok(Advance::Submitted(ack)) => terminal.say(&ack.message)?,
                        Err(WizardError::Invalid(errors)) => {
                            terminal.say("\nIspravite označena polja:")?;
                            for (field_id, message) in errors.iter() {
                                terminal.say(&format!("  {field_id}: {message}"))?;
                            }
                        }
                        Err(WizardError::Submission(_)) => {
                            let message = wizard.submit_error().unwrap_or_default().to_string();
                            terminal.say(&format!("\n{message}"))?;
                            retry_submission(terminal, &mut wizard, submitter).await?;
                        }
                        Err(err) => terminal.say(&err.to_string())?,
                    },
                }
            }
            WizardPhase::Submitted => return Ok(()),
            WizardPhase::Submitting => return Ok(()),
        }
    }
}

/// Offers to resend the unchanged request until it succeeds or the visitor
/// declines. Declining returns to the last step with the data intact.
async fn retry_submission<R: BufRead, W: Write>(
    terminal: &mut Terminal<R, W>,
    wizard: &mut QuoteWizard,
    submitter: &HttpQuoteSubmitter,
) -> io::Result<()> {
    loop {
        let answer = terminal.ask("Pokušati ponovo? [D/n]: ")?;
        if matches!(answer.as_deref(), None | Some("n") | Some("N")) {
            return Ok(());
        }
        match wizard.submit(submitter).await {
            Ok(ack) => return terminal.say(&ack.message),
            Err(_) => {
                let message = wizard.submit_error().unwrap_or_default().to_string();
                terminal.say(&message)?;
            }
        }
    }
}

#[tokio::main]
async fn main() {
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("warn"));

    let cli = Cli::parse();

    let preselected = match cli.project_type.as_deref().map(str::parse::<ProjectType>) {
        Some(Ok(project_type)) => Some(project_type),
        Some(Err(err)) => {
            log::error!("Unknown project type: {err}");
            std::process::exit(2);
        }
        None => None,
    };

    let submitter = HttpQuoteSubmitter::new(cli.endpoint);
    let stdin = io::stdin();
    let mut terminal = Terminal {
        input: stdin.lock(),
        output: io::stdout(),
    };

    if let Err(err) = run(&mut terminal, &submitter, preselected).await {
        log::error!("Terminal error: {err}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn clap_command_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn options_are_picked_by_number_or_value() {
        const OPTIONS: &[FieldOption] = &[
            FieldOption {
                value: "ground",
                label: "Prizemlje",
            },
            FieldOption {
                value: "ground-plus-one",
                label: "P+1",
            },
        ];
        assert_eq!(pick_option(OPTIONS, "2").map(|o| o.value), Some("ground-plus-one"));
        assert_eq!(pick_option(OPTIONS, "ground").map(|o| o.value), Some("ground"));
        assert!(pick_option(OPTIONS, "0").is_none());
        assert!(pick_option(OPTIONS, "attic").is_none());
    }
}
