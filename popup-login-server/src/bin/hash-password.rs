//! Hash a password for the accounts file. Reads one line from stdin and
//! prints the argon2 PHC string to put in `password_hash`.
//!
//! ```sh
//! echo 'letmein' | hash-password
//! ```

use argon2::{
    password_hash::{rand_core::OsRng, SaltString},
    Argon2, PasswordHasher,
};
use color_eyre::eyre::eyre;
use popup_login_core::html;
use std::io::{self, BufRead};

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;

    // the server drops control characters before checking, so hash what it
    // will see
    let password = html::strip_control(line.trim_end_matches(['\r', '\n']));

    if password.is_empty() {
        return Err(eyre!("refusing to hash an empty password"));
    }

    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|err| eyre!("error while hashing password: {err}"))?;

    println!("{hash}");

    Ok(())
}
