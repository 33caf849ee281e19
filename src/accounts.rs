use crate::error::{GameError, GameResult};
use rand::Rng;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashMap;

/// Salted password digest
#[derive(Clone, Debug, Serialize, Deserialize)]
struct Credential {
    salt: [u8; 16],
    digest: Vec<u8>,
}

impl Credential {
    fn new(password: &str, rng: &mut impl Rng) -> Self {
        let salt: [u8; 16] = rng.gen();
        let digest = hash(&salt, password);
        Self { salt, digest }
    }

    fn verify(&self, password: &str) -> bool {
        hash(&self.salt, password) == self.digest
    }
}

fn hash(salt: &[u8], password: &str) -> Vec<u8> {
    let mut hasher = Sha256::new();
    hasher.update(salt);
    hasher.update(password.as_bytes());
    hasher.finalize().to_vec()
}

/// Registered managers and the club each one runs
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Accounts {
    credentials: HashMap<String, Credential>,
    clubs: HashMap<String, String>,
}

impl Accounts {
    pub fn contains(&self, email: &str) -> bool {
        self.credentials.contains_key(email)
    }

    pub fn register(
        &mut self,
        email: &str,
        password: &str,
        club: &str,
        rng: &mut impl Rng,
    ) -> GameResult<()> {
        if self.contains(email) {
            return Err(GameError::DuplicateRegistration(email.to_string()));
        }
        self.credentials
            .insert(email.to_string(), Credential::new(password, rng));
        self.clubs.insert(email.to_string(), club.to_string());
        Ok(())
    }

    pub fn authenticate(&self, email: &str, password: &str) -> GameResult<()> {
        match self.credentials.get(email) {
            Some(credential) if credential.verify(password) => Ok(()),
            _ => Err(GameError::InvalidCredentials),
        }
    }

    pub fn club_of(&self, email: &str) -> Option<&str> {
        self.clubs.get(email).map(String::as_str)
    }

    /// Clubs already taken by a manager
    pub fn managed_clubs(&self) -> impl Iterator<Item = &str> {
        self.clubs.values().map(String::as_str)
    }
}
