use std::io::{BufRead, Write};

use courier_optimizer::{problem::service_clock::END_OF_DAY, reporting::status::status_at};

use crate::{parsers, session::Session, status, tables};

const MENU: &str = "\
1. Status of all packages at a time
2. Look up a package
3. Run summary
4. Exit";

fn prompt<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    message: &str,
) -> Result<Option<String>, anyhow::Error> {
    write!(output, "{message}")?;
    output.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_owned()))
}

/// Reads menu choices from `input` until the user exits or input ends.
pub fn run<R: BufRead, W: Write>(
    session: &Session,
    mut input: R,
    mut output: W,
) -> Result<(), anyhow::Error> {
    loop {
        writeln!(output, "\n{MENU}")?;
        let Some(choice) = prompt(&mut input, &mut output, "Choice (1-4): ")? else {
            return Ok(());
        };

        match choice.as_str() {
            "1" => {
                let Some(text) = prompt(&mut input, &mut output, "Time (e.g. 10:05): ")? else {
                    return Ok(());
                };
                match parsers::parse_clock(&text) {
                    Ok(at) => {
                        let minute = session.clock.minutes_since_start(at);
                        let snapshot = status_at(&session.packages, &session.trips, minute);
                        writeln!(output, "{}", tables::snapshot_table(&snapshot, &session.clock))?;
                    }
                    Err(error) => writeln!(output, "{error}")?,
                }
            }
            "2" => {
                let Some(id) = prompt(&mut input, &mut output, "Package ID: ")? else {
                    return Ok(());
                };
                let Some(text) = prompt(&mut input, &mut output, "Time (blank for end of day): ")?
                else {
                    return Ok(());
                };

                let at = if text.is_empty() {
                    Ok(END_OF_DAY)
                } else {
                    parsers::parse_clock(&text)
                };
                let line = match (id.parse::<u32>(), at) {
                    (Ok(id), Ok(at)) => status::describe_package(session, id, at)
                        .unwrap_or_else(|error| error.to_string()),
                    (Err(_), _) => format!("Invalid package ID {id:?}"),
                    (_, Err(error)) => error,
                };
                writeln!(output, "{line}")?;
            }
            "3" => {
                writeln!(output, "{}", tables::summary_table(&session.result, None))?;
                writeln!(
                    output,
                    "{}",
                    tables::vehicles_table(&session.result, &session.clock)
                )?;
            }
            "4" | "q" | "quit" | "exit" => return Ok(()),
            other => writeln!(output, "Unknown choice {other:?}")?,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::session;

    use super::*;

    fn run_menu(input: &str) -> String {
        let session = session::load_fixture();
        let mut output = Vec::new();
        run(&session, input.as_bytes(), &mut output).unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn test_status_and_lookup() {
        let output = run_menu("1\n08:55\n2\n6\n08:55\n2\n6\n\n4\n");

        assert!(output.contains("AT HUB"));
        assert!(output.contains("Package 6 @ 08:55: AT HUB"));
        assert!(output.contains("Package 6 @ 17:00: DELIVERED"));
    }

    #[test]
    fn test_invalid_input_is_reported() {
        let output = run_menu("7\n1\nnoon\n2\nabc\n\n2\n99\n\n");

        assert!(output.contains("Unknown choice \"7\""));
        assert!(output.contains("Invalid time \"noon\""));
        assert!(output.contains("Invalid package ID \"abc\""));
        assert!(output.contains("No package with ID 99"));
    }
}
