use crate::utils::wordlist;
use crate::{Result, ScanError};
use log::info;
use std::io::{self, BufRead, Write};
use std::path::Path;

/// Supplies the ordered host/user/password sequences the pipeline consumes.
/// Inline comma lists win over files; when neither is given, usernames and
/// passwords fall back to an interactive prompt.

pub fn split_inline(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|part| part.trim().to_string())
        .filter(|part| !part.is_empty())
        .collect()
}

/// Split a shell-style option string into arguments. Single and double
/// quotes group words, backslash escapes the next character; an unclosed
/// quote runs to the end of the string.
pub fn split_options(value: &str) -> Vec<String> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut quote: Option<char> = None;
    let mut chars = value.chars();

    while let Some(c) = chars.next() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => current.push(c),
            None => match c {
                '\'' | '"' => {
                    quote = Some(c);
                    in_word = true;
                }
                '\\' => {
                    if let Some(next) = chars.next() {
                        current.push(next);
                        in_word = true;
                    }
                }
                c if c.is_whitespace() => {
                    if in_word {
                        args.push(std::mem::take(&mut current));
                        in_word = false;
                    }
                }
                c => {
                    current.push(c);
                    in_word = true;
                }
            },
        }
    }

    if in_word {
        args.push(current);
    }

    args
}

async fn read_list(inline: Option<&str>, file: Option<&Path>) -> Result<Option<Vec<String>>> {
    if let Some(inline) = inline {
        return Ok(Some(split_inline(inline)));
    }
    if let Some(path) = file {
        return Ok(Some(wordlist::load_wordlist(path).await?));
    }
    Ok(None)
}

/// Host specifications from inline arguments or a file. Hosts are never
/// prompted for.
pub async fn host_specs(inline: Option<&str>, file: Option<&Path>) -> Result<Vec<String>> {
    let specs = read_list(inline, file)
        .await?
        .ok_or_else(|| ScanError::Config("No hosts provided! Use -H or --hosts-file.".to_string()))?;

    if specs.is_empty() {
        return Err(ScanError::Config("No hosts provided! Use -H or --hosts-file.".to_string()));
    }

    Ok(specs)
}

/// Usernames from inline arguments, a file, or a prompt.
pub async fn usernames(inline: Option<&str>, file: Option<&Path>) -> Result<Vec<String>> {
    info!("Reading usernames...");

    let mut users = read_list(inline, file).await?.unwrap_or_default();
    if users.is_empty() {
        users.push(prompt_line("Enter your SSH username: ")?);
    }

    users.retain(|user| !user.is_empty());
    if users.is_empty() {
        return Err(ScanError::Config("No usernames provided! Use -u or --users-file.".to_string()));
    }

    Ok(users)
}

/// Passwords from inline arguments, a file, or a prompt. Secret mode masks
/// the prompt input.
pub async fn passwords(inline: Option<&str>, file: Option<&Path>, secret: bool) -> Result<Vec<String>> {
    info!("Reading passwords...");

    let mut passwords = read_list(inline, file).await?.unwrap_or_default();
    if passwords.is_empty() {
        let password = if secret {
            rpassword::prompt_password("Enter your SSH password: ")
                .map_err(|e| ScanError::Config(format!("Failed to read password: {}", e)))?
        } else {
            prompt_line("Enter your SSH password: ")?
        };
        passwords.push(password);
    }

    passwords.retain(|password| !password.is_empty());
    if passwords.is_empty() {
        return Err(ScanError::Config("No passwords provided! Use -p or --passwords-file.".to_string()));
    }

    Ok(passwords)
}

fn prompt_line(prompt: &str) -> Result<String> {
    print!("{}", prompt);
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim().to_string())
}
