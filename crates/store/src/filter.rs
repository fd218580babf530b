//! The `(field, field__op)` query grammar used by the events listing API:
//! plain `field=value` means equality, `field__op=value` selects a
//! comparison operator.

use oncall_domain::model::Event;
use oncall_domain::{Error, Result};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Eq,
    Ne,
    Gt,
    Ge,
    Lt,
    Le,
}

impl Op {
    fn parse(suffix: &str) -> Result<Op> {
        match suffix {
            "eq" => Ok(Op::Eq),
            "ne" => Ok(Op::Ne),
            "gt" => Ok(Op::Gt),
            "ge" => Ok(Op::Ge),
            "lt" => Ok(Op::Lt),
            "le" => Ok(Op::Le),
            other => Err(Error::bad_request(format!("unknown filter operator '{other}'"))),
        }
    }
}

pub struct FilterClause {
    pub field: String,
    pub op: Op,
    pub value: Value,
}

pub struct Filter {
    pub clauses: Vec<FilterClause>,
}

impl Filter {
    /// Parse from the raw query-string pairs (already split on `&`/`=` by
    /// the gateway layer).
    pub fn from_pairs(pairs: &[(String, String)]) -> Result<Filter> {
        let mut clauses = Vec::new();
        for (key, raw_value) in pairs {
            let (field, op) = match key.split_once("__") {
                Some((field, suffix)) => (field.to_string(), Op::parse(suffix)?),
                None => (key.clone(), Op::Eq),
            };
            let value = coerce(raw_value);
            clauses.push(FilterClause { field, op, value });
        }
        Ok(Filter { clauses })
    }

    pub fn matches(&self, event: &Event) -> bool {
        self.clauses.iter().all(|c| clause_matches(c, event))
    }
}

fn coerce(raw: &str) -> Value {
    if let Ok(n) = raw.parse::<i64>() {
        Value::from(n)
    } else if let Ok(b) = raw.parse::<bool>() {
        Value::from(b)
    } else {
        Value::from(raw)
    }
}

fn field_value(event: &Event, field: &str) -> Option<Value> {
    match field {
        "id" => Some(Value::from(event.id)),
        "start" => Some(Value::from(event.start)),
        "end" => Some(Value::from(event.end)),
        "user" | "user_id" => Some(Value::from(event.user_id)),
        "team" | "team_id" => Some(Value::from(event.team_id)),
        "role" | "role_id" => Some(Value::from(event.role_id)),
        "link_id" => event.link_id.clone().map(Value::from),
        _ => None,
    }
}

fn clause_matches(clause: &FilterClause, event: &Event) -> bool {
    let Some(actual) = field_value(event, &clause.field) else {
        return false;
    };
    let ordering = match (actual.as_i64(), clause.value.as_i64()) {
        (Some(a), Some(b)) => a.cmp(&b),
        _ => {
            return match clause.op {
                Op::Eq => actual == clause.value,
                Op::Ne => actual != clause.value,
                _ => false,
            }
        }
    };
    match clause.op {
        Op::Eq => ordering == std::cmp::Ordering::Equal,
        Op::Ne => ordering != std::cmp::Ordering::Equal,
        Op::Gt => ordering == std::cmp::Ordering::Greater,
        Op::Ge => ordering != std::cmp::Ordering::Less,
        Op::Lt => ordering == std::cmp::Ordering::Less,
        Op::Le => ordering != std::cmp::Ordering::Greater,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ev() -> Event {
        Event {
            id: 1,
            start: 100,
            end: 200,
            user_id: 7,
            team_id: 1,
            role_id: 1,
            schedule_id: None,
            link_id: None,
            note: None,
        }
    }

    #[test]
    fn equality_default() {
        let f = Filter::from_pairs(&[("user".into(), "7".into())]).unwrap();
        assert!(f.matches(&ev()));
    }

    #[test]
    fn gt_operator() {
        let f = Filter::from_pairs(&[("start__gt".into(), "50".into())]).unwrap();
        assert!(f.matches(&ev()));
        let f = Filter::from_pairs(&[("start__gt".into(), "100".into())]).unwrap();
        assert!(!f.matches(&ev()));
    }

    #[test]
    fn unknown_operator_rejected() {
        assert!(Filter::from_pairs(&[("start__bogus".into(), "1".into())]).is_err());
    }
}
