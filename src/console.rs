// Line-oriented terminal front end for the job controller

use crate::api::Job;
use crate::controller::{ControllerState, ExportError, JobLifecycleController, SubmitOutcome};
use tokio::io::{AsyncBufReadExt, BufReader};

pub const HELP: &str = "\
Commands:
  submit [url]       submit a video (no url: retry the current input)
  url <url>          set the input without submitting
  refresh | list     reload the job list
  show <id>          show one job
  export <id>        save the job's subtitles
  translation <id>   print the job's translated subtitles
  help               show this text
  quit               exit
A line holding only an http(s) URL is submitted directly.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Submit(Option<String>),
    SetUrl(String),
    Refresh,
    Show(String),
    Export(String),
    Translation(String),
    Help,
    Quit,
}

/// `Ok(None)` for blank lines.
pub fn parse_command(line: &str) -> Result<Option<Command>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    if looks_like_url(line) && !line.contains(char::is_whitespace) {
        return Ok(Some(Command::Submit(Some(line.to_string()))));
    }

    let (name, arg) = match line.split_once(char::is_whitespace) {
        Some((name, rest)) => (name, rest.trim()),
        None => (line, ""),
    };

    let required = |what: &str| -> Result<String, String> {
        if arg.is_empty() {
            Err(format!("'{}' needs {}", name, what))
        } else {
            Ok(arg.to_string())
        }
    };

    let command = match name.to_ascii_lowercase().as_str() {
        "submit" | "s" => Command::Submit((!arg.is_empty()).then(|| arg.to_string())),
        "url" => Command::SetUrl(required("a URL")?),
        "refresh" | "list" | "ls" => Command::Refresh,
        "show" => Command::Show(required("a job id")?),
        "export" | "download" => Command::Export(required("a job id")?),
        "translation" => Command::Translation(required("a job id")?),
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        other => return Err(format!("Unknown command '{}'. Type 'help'.", other)),
    };

    Ok(Some(command))
}

fn looks_like_url(line: &str) -> bool {
    let lower = line.to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

pub fn render_jobs(jobs: &[Job]) -> String {
    if jobs.is_empty() {
        return "No jobs yet.\n".to_string();
    }

    let mut out = format!("{:<38} {:<12} {:<17} {}\n", "ID", "STATUS", "UPDATED", "URL");
    for job in jobs {
        let updated = job
            .updated_at
            .or(job.created_at)
            .map(|ts| ts.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "-".to_string());
        out.push_str(&format!(
            "{:<38} {:<12} {:<17} {}\n",
            job.id,
            job.status.as_str(),
            updated,
            job.source_url
        ));
    }
    out
}

/// Job table followed by the connectivity notice, if any.
pub fn render_job_list(state: &ControllerState) -> String {
    let mut out = render_jobs(&state.jobs);
    if let Some(notice) = state.list_notice.as_ref() {
        out.push_str(&format!("! {}\n", notice));
    }
    out
}

pub fn render_status(state: &ControllerState) -> String {
    let mut lines = Vec::new();
    if !state.status_message.is_empty() {
        lines.push(state.status_message.clone());
    }
    if let Some(notice) = state.list_notice.as_ref() {
        lines.push(format!("! {}", notice));
    }
    if !state.input_url.is_empty() {
        lines.push(format!("(input: {})", state.input_url));
    }
    lines.join("\n")
}

/// Runs one command. Returns false when the console should exit.
pub async fn execute(controller: &JobLifecycleController, command: Command) -> bool {
    match command {
        Command::Submit(url) => {
            if let Some(url) = url {
                controller.set_input(url).await;
            }
            if let SubmitOutcome::Created(job) = controller.submit().await {
                tracing::debug!("Submitted {}", job.id);
            }
            println!("{}", render_status(&controller.state()));
        }
        Command::SetUrl(url) => {
            controller.set_input(url).await;
            println!("{}", render_status(&controller.state()));
        }
        Command::Refresh => {
            controller.refresh().await;
            print!("{}", render_job_list(&controller.state()));
        }
        Command::Show(id) => match controller.job_details(&id).await {
            Ok(job) => print!("{}", render_jobs(std::slice::from_ref(&job))),
            Err(e) => println!("An error occurred: {}", e),
        },
        Command::Export(id) => match controller.download_transcript(&id).await {
            Ok(path) => println!("Saved {}", path.display()),
            Err(ExportError::EmptyContent) => println!("No subtitle data for job {}.", id),
            Err(e) => println!("An error occurred: {}", e),
        },
        Command::Translation(id) => match controller.translation(&id).await {
            Ok(translation) => println!(
                "[{} -> {}, {}]\n{}",
                translation.source_lang,
                translation.target_lang,
                translation.model_used,
                translation.translated_srt
            ),
            Err(e) => println!("An error occurred: {}", e),
        },
        Command::Help => println!("{}", HELP),
        Command::Quit => return false,
    }
    true
}

pub async fn run_console(controller: JobLifecycleController) -> std::io::Result<()> {
    controller.activate().await;
    controller.settle().await;
    print!("{}", render_job_list(&controller.state()));
    println!("Type 'help' for commands.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match parse_command(&line) {
            Ok(Some(command)) => {
                if !execute(&controller, command).await {
                    break;
                }
            }
            Ok(None) => {}
            Err(message) => println!("{}", message),
        }
    }

    controller.settle().await;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::JobStatus;

    #[test]
    fn test_bare_url_submits() {
        assert_eq!(
            parse_command("  https://youtube.com/watch?v=1 ").unwrap(),
            Some(Command::Submit(Some("https://youtube.com/watch?v=1".to_string())))
        );
    }

    #[test]
    fn test_submit_without_url_retries_input() {
        assert_eq!(parse_command("submit").unwrap(), Some(Command::Submit(None)));
    }

    #[test]
    fn test_commands_with_ids() {
        assert_eq!(
            parse_command("export abc-1").unwrap(),
            Some(Command::Export("abc-1".to_string()))
        );
        assert_eq!(
            parse_command("Translation  abc-1").unwrap(),
            Some(Command::Translation("abc-1".to_string()))
        );
        assert_eq!(parse_command("list").unwrap(), Some(Command::Refresh));
    }

    #[test]
    fn test_missing_argument_and_unknown_command() {
        assert!(parse_command("export").unwrap_err().contains("job id"));
        assert!(parse_command("frobnicate").unwrap_err().contains("Unknown command"));
        assert_eq!(parse_command("   ").unwrap(), None);
    }

    #[test]
    fn test_render_jobs_table() {
        let jobs = vec![Job {
            id: "job-1".to_string(),
            source_url: "https://youtu.be/x".to_string(),
            audio_url: None,
            status: JobStatus::Completed,
            created_at: None,
            updated_at: None,
        }];
        let out = render_jobs(&jobs);
        let row = out.lines().nth(1).unwrap();

        assert!(out.starts_with("ID"));
        assert!(row.starts_with("job-1"));
        assert!(row.contains("completed"));
        assert!(row.ends_with("https://youtu.be/x"));
        assert_eq!(render_jobs(&[]), "No jobs yet.\n");
    }

    #[test]
    fn test_empty_list_and_notice_stay_on_separate_lines() {
        let state = ControllerState {
            list_notice: Some("Could not load jobs.".to_string()),
            ..Default::default()
        };
        assert_eq!(render_job_list(&state), "No jobs yet.\n! Could not load jobs.\n");
    }

    #[test]
    fn test_render_status_includes_notice_and_input() {
        let state = ControllerState {
            input_url: "https://youtu.be/x".to_string(),
            status_message: "An error occurred: Server returned HTTP 500".to_string(),
            list_notice: Some("offline".to_string()),
            ..Default::default()
        };
        assert_eq!(
            render_status(&state),
            "An error occurred: Server returned HTTP 500\n! offline\n(input: https://youtu.be/x)"
        );
    }
}
