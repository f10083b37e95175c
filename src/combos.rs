use crate::types::Attempt;

/// Build the full cartesian product of (host, user, password) as an ordered
/// attempt sequence.
///
/// Nesting order is user -> password -> host, outermost first, so two runs
/// over identical inputs enumerate identically. Duplicate inputs produce
/// duplicate attempts; nothing is de-duplicated here.
pub fn generate(hosts: &[String], users: &[String], passwords: &[String]) -> Vec<Attempt> {
    let mut attempts = Vec::with_capacity(hosts.len() * users.len() * passwords.len());

    for user in users {
        for password in passwords {
            for host in hosts {
                attempts.push(Attempt::new(host.clone(), user.clone(), password.clone()));
            }
        }
    }

    attempts
}
