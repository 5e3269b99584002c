/// HTTP method as seen by the router. Anything other than GET/POST never
/// matches a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Other,
}

impl Method {
    pub fn parse(method: &str) -> Self {
        match method {
            "GET" => Method::Get,
            "POST" => Method::Post,
            _ => Method::Other,
        }
    }
}

/// Ledger operation selected by a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    OpenAccount,
    Transfer,
    GetAccount,
    Deposit,
    Withdraw,
    ApplyInterest,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Segment {
    Literal(&'static str),
    AccountNumber,
}

/// A (method, path shape) pair bound to an operation.
#[derive(Debug)]
pub struct RouteDescriptor {
    method: Method,
    segments: &'static [Segment],
    operation: Operation,
}

use Segment::{AccountNumber, Literal};

const ROUTES: &[RouteDescriptor] = &[
    RouteDescriptor {
        method: Method::Post,
        segments: &[Literal("accounts")],
        operation: Operation::OpenAccount,
    },
    RouteDescriptor {
        method: Method::Post,
        segments: &[Literal("accounts"), Literal("transfer")],
        operation: Operation::Transfer,
    },
    RouteDescriptor {
        method: Method::Get,
        segments: &[Literal("accounts"), AccountNumber],
        operation: Operation::GetAccount,
    },
    RouteDescriptor {
        method: Method::Post,
        segments: &[Literal("accounts"), AccountNumber, Literal("deposit")],
        operation: Operation::Deposit,
    },
    RouteDescriptor {
        method: Method::Post,
        segments: &[Literal("accounts"), AccountNumber, Literal("withdraw")],
        operation: Operation::Withdraw,
    },
    RouteDescriptor {
        method: Method::Post,
        segments: &[Literal("accounts"), AccountNumber, Literal("applyInterest")],
        operation: Operation::ApplyInterest,
    },
];

/// A matched route with its extracted path parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteMatch<'a> {
    pub operation: Operation,
    pub account_number: Option<&'a str>,
}

impl RouteDescriptor {
    fn is_literal(&self) -> bool {
        self.segments
            .iter()
            .all(|segment| matches!(segment, Literal(_)))
    }

    /// Match the path shape, returning the captured account number (if any).
    fn capture<'a>(&self, parts: &[&'a str]) -> Option<Option<&'a str>> {
        if parts.len() != self.segments.len() {
            return None;
        }

        let mut account_number = None;
        for (segment, part) in self.segments.iter().zip(parts) {
            match segment {
                Literal(expected) if expected == part => {}
                Literal(_) => return None,
                AccountNumber if part.is_empty() => return None,
                AccountNumber => account_number = Some(*part),
            }
        }
        Some(account_number)
    }
}

/// Resolve a request line to an operation.
///
/// A path equal to a literal route (`/accounts/transfer`) is only ever
/// considered against literal routes, so it is never captured as an account
/// number, whatever the method.
pub fn match_route(method: Method, path: &str) -> Option<RouteMatch<'_>> {
    let parts: Vec<&str> = path.strip_prefix('/')?.split('/').collect();

    let literal_path = ROUTES
        .iter()
        .filter(|route| route.is_literal())
        .any(|route| route.capture(&parts).is_some());

    ROUTES
        .iter()
        .filter(|route| route.is_literal() == literal_path && route.method == method)
        .find_map(|route| {
            route.capture(&parts).map(|account_number| RouteMatch {
                operation: route.operation,
                account_number,
            })
        })
}
