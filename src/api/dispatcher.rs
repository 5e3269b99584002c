use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, error, warn};

use crate::application::{LedgerError, LedgerService};
use crate::domain::{Account, AccountType, Amount};

use super::{Method, Operation, match_route};

pub const ROUTE_NOT_FOUND_MESSAGE: &str = "API does not exist";
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

pub const TRANSFER_OK_MESSAGE: &str = "Transfer successful";
pub const DEPOSIT_OK_MESSAGE: &str = "Deposit successful";
pub const WITHDRAW_OK_MESSAGE: &str = "Withdrawal successful";
pub const INTEREST_OK_MESSAGE: &str = "Interest applied successfully";

/// Decoded request body. Which fields are required depends on the route.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestBody {
    #[serde(default)]
    pub owner_name: Option<String>,
    #[serde(default)]
    pub account_type: Option<String>,
    #[serde(default)]
    pub from_account: Option<String>,
    #[serde(default)]
    pub to_account: Option<String>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub amount: Option<Amount>,
}

/// A request as handed over by the transport.
#[derive(Debug, Clone)]
pub struct Request {
    pub method: Method,
    pub path: String,
    pub body: RequestBody,
}

impl Request {
    pub fn new(method: Method, path: impl Into<String>, body: RequestBody) -> Self {
        Self {
            method,
            path: path.into(),
            body,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Ok,
    BadRequest,
    NotFound,
    InternalError,
}

/// Response payload: an account, or a single message string.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ResponseBody {
    Account(Account),
    Message(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub status: Status,
    pub body: ResponseBody,
}

impl Response {
    pub fn account(account: Account) -> Self {
        Self {
            status: Status::Ok,
            body: ResponseBody::Account(account),
        }
    }

    pub fn message(status: Status, message: impl Into<String>) -> Self {
        Self {
            status,
            body: ResponseBody::Message(message.into()),
        }
    }

    /// Map a failure to its response. Validation failures carry their own
    /// message; unexpected ones are logged and answered generically.
    pub fn from_error(err: &DispatchError) -> Self {
        match err {
            DispatchError::Ledger(ledger_err) if ledger_err.is_validation() => {
                warn!(error = %ledger_err, "request rejected");
                Self::message(Status::BadRequest, ledger_err.to_string())
            }
            DispatchError::RouteNotFound { method, path } => {
                debug!(?method, %path, "no route");
                Self::message(Status::NotFound, ROUTE_NOT_FOUND_MESSAGE)
            }
            other => {
                error!(error = %other, "request failed");
                Self::message(Status::InternalError, INTERNAL_ERROR_MESSAGE)
            }
        }
    }
}

#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("no route for {method:?} {path}")]
    RouteNotFound { method: Method, path: String },

    #[error("request body is missing field `{0}`")]
    MissingField(&'static str),

    #[error("request body is not valid JSON: {0}")]
    MalformedBody(#[from] serde_json::Error),

    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

/// Maps requests onto ledger operations.
#[derive(Clone)]
pub struct Dispatcher {
    service: Arc<LedgerService>,
}

impl Dispatcher {
    pub fn new(service: Arc<LedgerService>) -> Self {
        Self { service }
    }

    pub fn service(&self) -> &LedgerService {
        &self.service
    }

    pub fn dispatch(&self, request: Request) -> Response {
        match self.route(request) {
            Ok(response) => response,
            Err(err) => Response::from_error(&err),
        }
    }

    fn route(&self, request: Request) -> Result<Response, DispatchError> {
        let Request { method, path, body } = request;
        let Some(matched) = match_route(method, &path) else {
            return Err(DispatchError::RouteNotFound { method, path });
        };
        // Routes with a path parameter always capture one.
        let account_number = matched.account_number.unwrap_or_default();

        let response = match matched.operation {
            Operation::OpenAccount => {
                let owner_name = required(body.owner_name, "ownerName")?;
                let account_type = required(body.account_type, "accountType")?;
                let account = self
                    .service
                    .open_account(owner_name, AccountType::from(account_type));
                Response::account(account)
            }
            Operation::Transfer => {
                let from = required(body.from_account, "fromAccount")?;
                let to = required(body.to_account, "toAccount")?;
                let amount = required(body.amount, "amount")?;
                self.service.transfer(&from, &to, amount)?;
                Response::message(Status::Ok, TRANSFER_OK_MESSAGE)
            }
            Operation::GetAccount => Response::account(self.service.get_account(account_number)?),
            Operation::Deposit => {
                let amount = required(body.amount, "amount")?;
                self.service.deposit(account_number, amount)?;
                Response::message(Status::Ok, DEPOSIT_OK_MESSAGE)
            }
            Operation::Withdraw => {
                let amount = required(body.amount, "amount")?;
                self.service.withdraw(account_number, amount)?;
                Response::message(Status::Ok, WITHDRAW_OK_MESSAGE)
            }
            Operation::ApplyInterest => {
                self.service.apply_monthly_interest(account_number)?;
                Response::message(Status::Ok, INTEREST_OK_MESSAGE)
            }
        };
        Ok(response)
    }
}

fn required<T>(field: Option<T>, name: &'static str) -> Result<T, DispatchError> {
    field.ok_or(DispatchError::MissingField(name))
}
