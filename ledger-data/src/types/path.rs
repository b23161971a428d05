// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

use std::io::Write;

use serde_json::{Map, Value as Json};

use super::{AccountId, Currency};
use crate::{BinaryParser, Error, Result, Serializable};

const STEP_ACCOUNT: u8 = 0x01;
const STEP_CURRENCY: u8 = 0x10;
const STEP_ISSUER: u8 = 0x20;
const PATH_SEPARATOR: u8 = 0xFF;
const PATHSET_END: u8 = 0x00;

/// One hop of a payment path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct PathStep {
    pub account: Option<AccountId>,
    pub currency: Option<Currency>,
    pub issuer: Option<AccountId>,
}

impl PathStep {
    fn type_byte(&self) -> u8 {
        let mut kind = 0;
        if self.account.is_some() {
            kind |= STEP_ACCOUNT;
        }
        if self.currency.is_some() {
            kind |= STEP_CURRENCY;
        }
        if self.issuer.is_some() {
            kind |= STEP_ISSUER;
        }
        kind
    }

    fn to_json(&self) -> Json {
        let mut map = Map::new();
        if let Some(account) = &self.account {
            map.insert("account".into(), account.to_address().into());
        }
        if let Some(currency) = &self.currency {
            map.insert("currency".into(), currency.to_string().into());
        }
        if let Some(issuer) = &self.issuer {
            map.insert("issuer".into(), issuer.to_address().into());
        }
        Json::Object(map)
    }

    fn from_json(value: &Json, path: &str) -> Result<Self> {
        let Json::Object(map) = value else {
            return Err(Error::json(path, "expected a path step object"));
        };
        let step = Self {
            account: member(map, "account", path)?
                .map(AccountId::parse)
                .transpose()?,
            currency: member(map, "currency", path)?
                .map(Currency::parse)
                .transpose()?,
            issuer: member(map, "issuer", path)?
                .map(AccountId::parse)
                .transpose()?,
        };
        if step.type_byte() == 0 {
            return Err(Error::json(path, "path step has no members"));
        }
        Ok(step)
    }
}

fn member<'a>(
    map: &'a Map<String, Json>,
    key: &str,
    path: &str,
) -> Result<Option<&'a str>> {
    match map.get(key) {
        None => Ok(None),
        Some(Json::String(s)) => Ok(Some(s.as_str())),
        Some(_) => Err(Error::json(
            format!("{path}.{key}"),
            "expected a string",
        )),
    }
}

pub type Path = Vec<PathStep>;

/// Alternative paths of a payment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct PathSet(Vec<Path>);

impl PathSet {
    pub fn new(paths: Vec<Path>) -> Self {
        Self(paths)
    }

    pub fn paths(&self) -> &[Path] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn to_json(&self) -> Json {
        Json::Array(
            self.0
                .iter()
                .map(|p| Json::Array(p.iter().map(PathStep::to_json).collect()))
                .collect(),
        )
    }

    pub fn from_json(value: &Json, path: &str) -> Result<Self> {
        let Json::Array(paths) = value else {
            return Err(Error::json(path, "expected an array of paths"));
        };
        let mut out = Vec::with_capacity(paths.len());
        for (i, steps) in paths.iter().enumerate() {
            let at = format!("{path}[{i}]");
            let Json::Array(steps) = steps else {
                return Err(Error::json(at, "expected an array of steps"));
            };
            if steps.is_empty() {
                return Err(Error::json(at, "path has no steps"));
            }
            let steps = steps
                .iter()
                .enumerate()
                .map(|(j, s)| PathStep::from_json(s, &format!("{at}[{j}]")))
                .collect::<Result<Path>>()?;
            out.push(steps);
        }
        Ok(Self(out))
    }
}

impl Serializable for PathSet {
    fn write<W: Write>(&self, w: &mut W) -> Result<()> {
        for (i, path) in self.0.iter().enumerate() {
            if path.is_empty() {
                return Err(Error::Encoding(format!("path {i} has no steps")));
            }
            if i > 0 {
                w.write_all(&[PATH_SEPARATOR])?;
            }
            for step in path {
                let kind = step.type_byte();
                if kind == 0 {
                    return Err(Error::Encoding("empty path step".into()));
                }
                w.write_all(&[kind])?;
                if let Some(account) = &step.account {
                    account.write(w)?;
                }
                if let Some(currency) = &step.currency {
                    currency.write(w)?;
                }
                if let Some(issuer) = &step.issuer {
                    issuer.write(w)?;
                }
            }
        }
        w.write_all(&[PATHSET_END])?;
        Ok(())
    }

    fn read(parser: &mut BinaryParser<'_>) -> Result<Self> {
        let mut paths = vec![];
        let mut current = vec![];
        let empty_path = |offset| {
            Error::InvalidValue(format!("empty path at offset {offset}"))
        };
        loop {
            let offset = parser.position();
            match parser.read_u8()? {
                PATHSET_END if current.is_empty() && !paths.is_empty() => {
                    return Err(empty_path(offset));
                }
                PATHSET_END => break,
                PATH_SEPARATOR if current.is_empty() => {
                    return Err(empty_path(offset));
                }
                PATH_SEPARATOR => paths.push(std::mem::take(&mut current)),
                kind if kind & !(STEP_ACCOUNT | STEP_CURRENCY | STEP_ISSUER)
                    != 0 =>
                {
                    return Err(Error::InvalidValue(format!(
                        "invalid path step type {kind:#04x} at offset {offset}"
                    )));
                }
                kind => {
                    let mut step = PathStep::default();
                    if kind & STEP_ACCOUNT != 0 {
                        step.account = Some(AccountId::read(parser)?);
                    }
                    if kind & STEP_CURRENCY != 0 {
                        step.currency = Some(Currency::read(parser)?);
                    }
                    if kind & STEP_ISSUER != 0 {
                        step.issuer = Some(AccountId::read(parser)?);
                    }
                    current.push(step);
                }
            }
        }
        if !current.is_empty() {
            paths.push(current);
        }
        Ok(Self(paths))
    }
}
