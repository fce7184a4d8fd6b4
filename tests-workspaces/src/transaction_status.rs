use std::fmt::Debug;

use anyhow::{bail, Result};
use serde::de::DeserializeOwned;
use workspaces::result::CallExecutionDetails;

/// Turns transaction outcomes into `Result`s, so a failing test points at the call that broke.
pub trait StatusCheck {
    fn assert_success(&self) -> Result<()>;
    fn successful<T: DeserializeOwned>(self) -> Result<T>;
    fn assert_eq<T: DeserializeOwned + PartialEq + Debug>(self, expected_value: T) -> Result<T>;
    fn assert_err(&self, expected_error: &str) -> Result<()>;
    fn assert_event(&self, event: &str) -> Result<()>;
}

impl StatusCheck for Result<CallExecutionDetails> {
    fn assert_success(&self) -> Result<()> {
        let details = match self {
            Ok(details) => details,
            Err(err) => bail!("expected success, got error '{}'", err),
        };
        if details.is_success() && details.receipt_failures().is_empty() {
            Ok(())
        } else {
            bail!(
                "expected success, got failures:\n{:?}",
                details.receipt_failures()
            )
        }
    }

    fn successful<T>(self) -> Result<T>
    where
        T: DeserializeOwned,
    {
        self.assert_success()?;
        Ok(self?.json()?)
    }

    fn assert_eq<T>(self, expected_value: T) -> Result<T>
    where
        T: DeserializeOwned + PartialEq + Debug,
    {
        let value: T = self.successful()?;
        if value != expected_value {
            bail!("expected {:?}, got {:?}", expected_value, value);
        }
        Ok(value)
    }

    fn assert_err(&self, expected_error: &str) -> Result<()> {
        let details = match self {
            Ok(details) => details,
            Err(err) if err.to_string().contains(expected_error) => return Ok(()),
            Err(err) => bail!("expected error '{}', got '{}'", expected_error, err),
        };
        let failures = details.receipt_failures();
        if details.is_success() && failures.is_empty() {
            bail!("got success, expected error '{}'", expected_error);
        }
        if failures
            .iter()
            .any(|failure| format!("{:?}", failure).contains(expected_error))
        {
            Ok(())
        } else {
            bail!(
                "expected error '{}', got {:?}",
                expected_error,
                failures.first()
            )
        }
    }

    fn assert_event(&self, event: &str) -> Result<()> {
        let details = match self {
            Ok(details) => details,
            Err(err) => bail!("expected event '{}', got error '{}'", event, err),
        };
        let tag = format!("\"event\":\"{}\"", event);
        if details
            .logs()
            .iter()
            .any(|log| log.starts_with("EVENT_JSON:") && log.contains(&tag))
        {
            Ok(())
        } else {
            bail!("event '{}' not found in {:?}", event, details.logs())
        }
    }
}
