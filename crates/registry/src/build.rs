//! Builds typed operations from raw field values.
//!
//! Callers (the CLI, or anything embedding the catalog) hand over an ordered
//! map of wire field names to JSON values; this module validates required
//! fields, coerces enums, dates, and collections, and produces an
//! [`Operation`]. Validation happens here, before any request is assembled.

use std::path::PathBuf;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

use brickken_types::{ChainId, TokenType};

use crate::operation::{
    Approve, BurnToken, ClaimTokens, CloseOffer, DividendDistribution, InfoQuery, MintToken,
    NewInvest, NewSto, NewTokenization, Operation, PatchTokenDocs, PrepareMethod,
    PrepareTransactions, SendTransactions, TransferFrom, TransferTo, Whitelist,
};

/// Errors surfaced while turning raw values into an operation.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("unknown operation '{0}'")]
    UnknownOperation(String),

    #[error("missing required field '{field}' for '{operation}'")]
    MissingRequired { operation: String, field: String },

    #[error("invalid value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("chain id is 'custom' but no custom chain id was provided")]
    EmptyCustomChain,

    #[error("failed to serialize request body: {0}")]
    Body(#[from] serde_json::Error),
}

impl Operation {
    /// Build the typed operation named by a catalog entry from raw field values.
    pub fn from_values(
        name: &str,
        values: &IndexMap<String, Value>,
    ) -> Result<Self, BuildError> {
        build_operation(name, values)
    }
}

/// See [`Operation::from_values`].
pub fn build_operation(
    name: &str,
    values: &IndexMap<String, Value>,
) -> Result<Operation, BuildError> {
    let f = Fields { operation: name, values };
    let op = match name {
        "tx:prepare-new-tokenization" => prepare(
            f.chain()?,
            PrepareMethod::NewTokenization(NewTokenization {
                signer_address: f.optional("signerAddress"),
                token_symbol: f.optional("tokenSymbol"),
                tokenizer_email: f.optional("tokenizerEmail"),
                url: f.optional("url"),
                name: f.required("name")?,
                supply_cap: f.optional("supplyCap"),
                token_type: f.token_type("tokenType")?,
                pre_mints: f.json_list("preMints")?,
                initial_holders: f.json_list("initialHolders")?,
            }),
        ),
        "tx:prepare-new-sto" => prepare(
            f.chain()?,
            PrepareMethod::NewSto(NewSto {
                signer_address: f.optional("signerAddress"),
                token_symbol: f.optional("tokenSymbol"),
                tokenizer_email: f.optional("tokenizerEmail"),
                accepted_coin: f.required("acceptedCoin")?,
                token_amount: f.required("tokenAmount")?,
                offering_name: f.required("offeringName")?,
                start_date: f.datetime("startDate")?,
                end_date: f.datetime("endDate")?,
                min_raise_usd: f.optional("minRaiseUSD"),
                max_raise_usd: f.optional("maxRaiseUSD"),
                min_investment: f.required("minInvestment")?,
                max_investment: f.required("maxInvestment")?,
            }),
        ),
        "tx:prepare-new-invest" => prepare(
            f.chain()?,
            PrepareMethod::NewInvest(NewInvest {
                investor_address: f.optional("investorAddress"),
                token_symbol: f.optional("tokenSymbol"),
                payment_token_symbol: f.optional("paymentTokenSymbol"),
                investor_email: f.optional("investorEmail"),
                amount: f.optional("amount"),
            }),
        ),
        "tx:prepare-claim-tokens" => prepare(
            f.chain()?,
            PrepareMethod::ClaimTokens(ClaimTokens {
                investor_address: f.optional("investorAddress"),
                token_symbol: f.optional("tokenSymbol"),
                payment_token_symbol: f.optional("paymentTokenSymbol"),
                investor_email: f.optional("investorEmail"),
            }),
        ),
        "tx:prepare-close-offer" => prepare(
            f.chain()?,
            PrepareMethod::CloseOffer(CloseOffer {
                signer_address: f.optional("signerAddress"),
                token_symbol: f.optional("tokenSymbol"),
                tokenizer_email: f.optional("tokenizerEmail"),
            }),
        ),
        "tx:prepare-mint-token" => prepare(
            f.chain()?,
            PrepareMethod::MintToken(MintToken {
                signer_address: f.optional("signerAddress"),
                token_symbol: f.optional("tokenSymbol"),
                user_to_mint: f.json_list("userToMint")?,
            }),
        ),
        "tx:prepare-whitelist" => prepare(
            f.chain()?,
            PrepareMethod::Whitelist(Whitelist {
                signer_address: f.optional("signerAddress"),
                token_symbol: f.optional("tokenSymbol"),
                investor_email: f.optional("investorEmail"),
                user_to_whitelist: f.json_list("userToWhitelist")?,
            }),
        ),
        "tx:prepare-burn-token" => prepare(
            f.chain()?,
            PrepareMethod::BurnToken(BurnToken {
                signer_address: f.optional("signerAddress"),
                token_symbol: f.optional("tokenSymbol"),
                investor_email: f.optional("investorEmail"),
                amount: f.optional("amount"),
            }),
        ),
        "tx:prepare-transfer-from" => prepare(
            f.chain()?,
            PrepareMethod::TransferFrom(TransferFrom {
                signer_address: f.optional("signerAddress"),
                token_symbol: f.optional("tokenSymbol"),
                amount: f.optional("amount"),
                from: f.optional("from"),
                to: f.optional("to"),
            }),
        ),
        "tx:prepare-transfer-to" => prepare(
            f.chain()?,
            PrepareMethod::TransferTo(TransferTo {
                signer_address: f.optional("signerAddress"),
                token_symbol: f.optional("tokenSymbol"),
                amount: f.optional("amount"),
                to: f.optional("to"),
            }),
        ),
        "tx:prepare-approve" => prepare(
            f.chain()?,
            PrepareMethod::Approve(Approve {
                signer_address: f.optional("signerAddress"),
                token_symbol: f.optional("tokenSymbol"),
                tokenizer_email: f.optional("tokenizerEmail"),
                amount: f.optional("amount"),
                spender_address: f.optional("spenderAddress"),
                tokenizer_address: f.optional("tokenizerAddress"),
            }),
        ),
        "tx:prepare-dividend-distribution" => prepare(
            f.chain()?,
            PrepareMethod::DividendDistribution(DividendDistribution {
                signer_address: f.optional("signerAddress"),
                token_symbol: f.optional("tokenSymbol"),
                amount: f.optional("amount"),
            }),
        ),
        "tx:send" => Operation::Send(SendTransactions {
            signed_transactions: f.string_list("signedTransactions")?,
            tx_id: f.optional("txId"),
        }),
        "tx:patch-token-docs" => Operation::PatchTokenDocs(PatchTokenDocs {
            token_symbol: f.required("tokenSymbol")?,
            token_logotype: f.file_path("tokenLogotype"),
            subscription_agreement: f.file_path("subscriptionAgreement"),
            legal_docs: f.file_path("legalDocs"),
        }),
        "info:get-transaction-status" => Operation::Info(InfoQuery::TransactionStatus {
            hash: f.required("hash")?,
        }),
        "info:get-token-info" => Operation::Info(InfoQuery::TokenInfo {
            token_symbol: f.required("tokenSymbol")?,
            chain_id: f.chain()?,
        }),
        "info:get-balance-whitelist" => Operation::Info(InfoQuery::BalanceWhitelist {
            token_symbol: f.required("tokenSymbol")?,
            investor_email: f.required("investorEmail")?,
        }),
        "info:get-allowance" => Operation::Info(InfoQuery::Allowance {
            token_symbol: f.required("tokenSymbol")?,
            spender_address: f.required("spenderAddress")?,
            owner_address: f.required("ownerAddress")?,
        }),
        "info:get-tokenizer-info" => Operation::Info(InfoQuery::TokenizerInfo {
            token_symbol: f.required("tokenSymbol")?,
        }),
        "info:get-whitelist-status" => Operation::Info(InfoQuery::WhitelistStatus {
            token_symbol: f.required("tokenSymbol")?,
            investor_address: f.required("investorAddress")?,
        }),
        "info:get-dividend-distribution" => Operation::Info(InfoQuery::DividendDistributionInfo {
            token_symbol: f.required("tokenSymbol")?,
        }),
        "info:get-investments-by-sto-id" => Operation::Info(InfoQuery::InvestmentsByStoId {
            token_symbol: f.required("tokenSymbol")?,
            id: f.required("id")?,
        }),
        "info:get-investor-info" => Operation::Info(InfoQuery::InvestorInfo {
            token_symbol: f.required("tokenSymbol")?,
            email: f.required("email")?,
        }),
        "info:get-sto-balance" => Operation::Info(InfoQuery::StoBalance {
            token_symbol: f.required("tokenSymbol")?,
            id: f.required("id")?,
        }),
        "info:get-sto-by-id" => Operation::Info(InfoQuery::StoById {
            token_symbol: f.required("tokenSymbol")?,
            id: f.required("id")?,
        }),
        "info:get-stos" => Operation::Info(InfoQuery::Stos {
            token_symbol: f.required("tokenSymbol")?,
        }),
        "info:get-network-info" => Operation::Info(InfoQuery::NetworkInfo { chain_id: f.chain()? }),
        other => return Err(BuildError::UnknownOperation(other.to_string())),
    };
    Ok(op)
}

fn prepare(chain_id: ChainId, method: PrepareMethod) -> Operation {
    Operation::Prepare(PrepareTransactions { chain_id, method })
}

struct Fields<'a> {
    operation: &'a str,
    values: &'a IndexMap<String, Value>,
}

impl Fields<'_> {
    fn raw(&self, field: &str) -> Option<&Value> {
        self.values.get(field).filter(|v| !v.is_null())
    }

    /// A string-ish value; empty strings count as unset.
    fn optional(&self, field: &str) -> Option<String> {
        let value = self.raw(field)?;
        let text = match value {
            Value::String(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            _ => return None,
        };
        if text.trim().is_empty() { None } else { Some(text) }
    }

    fn required(&self, field: &str) -> Result<String, BuildError> {
        self.optional(field).ok_or_else(|| BuildError::MissingRequired {
            operation: self.operation.to_string(),
            field: field.to_string(),
        })
    }

    /// Resolve the chain selection, honoring the `custom` escape hatch.
    fn chain(&self) -> Result<ChainId, BuildError> {
        let selected = self.required("chainId")?;
        if selected == ChainId::CUSTOM {
            return match self.optional("customChainId") {
                Some(id) => Ok(ChainId::Custom(id)),
                None => Err(BuildError::EmptyCustomChain),
            };
        }
        ChainId::from_str(&selected).map_err(|e| BuildError::InvalidValue {
            field: "chainId".to_string(),
            reason: e.to_string(),
        })
    }

    fn token_type(&self, field: &str) -> Result<Option<TokenType>, BuildError> {
        match self.optional(field) {
            None => Ok(None),
            Some(raw) => TokenType::from_str(&raw)
                .map(Some)
                .map_err(|e| BuildError::InvalidValue {
                    field: field.to_string(),
                    reason: e.to_string(),
                }),
        }
    }

    fn datetime(&self, field: &str) -> Result<Option<DateTime<Utc>>, BuildError> {
        match self.optional(field) {
            None => Ok(None),
            Some(raw) => DateTime::parse_from_rfc3339(&raw)
                .map(|dt| Some(dt.with_timezone(&Utc)))
                .map_err(|e| BuildError::InvalidValue {
                    field: field.to_string(),
                    reason: format!("expected an RFC 3339 date-time: {e}"),
                }),
        }
    }

    /// A list of strings: a JSON array, a repeated flag, or a single value.
    fn string_list(&self, field: &str) -> Result<Vec<String>, BuildError> {
        let Some(value) = self.raw(field) else {
            return Ok(Vec::new());
        };
        match value {
            Value::Array(items) => items
                .iter()
                .map(|item| match item {
                    Value::String(s) => Ok(s.clone()),
                    other => Err(BuildError::InvalidValue {
                        field: field.to_string(),
                        reason: format!("expected a string, got {other}"),
                    }),
                })
                .collect(),
            Value::String(s) if s.trim_start().starts_with('[') => {
                serde_json::from_str(s).map_err(|e| BuildError::InvalidValue {
                    field: field.to_string(),
                    reason: format!("expected a JSON array of strings: {e}"),
                })
            }
            Value::String(s) if s.trim().is_empty() => Ok(Vec::new()),
            Value::String(s) => Ok(vec![s.clone()]),
            other => Err(BuildError::InvalidValue {
                field: field.to_string(),
                reason: format!("expected an array of strings, got {other}"),
            }),
        }
    }

    /// A list of typed objects, supplied as a JSON array or a JSON string.
    fn json_list<T: DeserializeOwned>(&self, field: &str) -> Result<Vec<T>, BuildError> {
        let Some(value) = self.raw(field) else {
            return Ok(Vec::new());
        };
        let parsed = match value {
            Value::Array(_) => serde_json::from_value(value.clone()),
            Value::String(s) if s.trim().is_empty() => return Ok(Vec::new()),
            Value::String(s) => serde_json::from_str(s),
            _ => {
                return Err(BuildError::InvalidValue {
                    field: field.to_string(),
                    reason: "expected a JSON array".to_string(),
                });
            }
        };
        parsed.map_err(|e| BuildError::InvalidValue {
            field: field.to_string(),
            reason: format!("expected a JSON array: {e}"),
        })
    }

    fn file_path(&self, field: &str) -> Option<PathBuf> {
        self.optional(field).map(PathBuf::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn values(pairs: &[(&str, Value)]) -> IndexMap<String, Value> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn missing_required_field_fails_validation() {
        let err = build_operation(
            "tx:prepare-new-tokenization",
            &values(&[("chainId", json!("aa36a7"))]),
        )
        .unwrap_err();
        match err {
            BuildError::MissingRequired { operation, field } => {
                assert_eq!(operation, "tx:prepare-new-tokenization");
                assert_eq!(field, "name");
            }
            other => panic!("expected MissingRequired, got {other:?}"),
        }
    }

    #[test]
    fn empty_string_counts_as_unset_for_required_fields() {
        let err = build_operation(
            "info:get-transaction-status",
            &values(&[("hash", json!("   "))]),
        )
        .unwrap_err();
        assert!(matches!(err, BuildError::MissingRequired { field, .. } if field == "hash"));
    }

    #[test]
    fn custom_chain_requires_a_value() {
        let base = [
            ("chainId", json!("custom")),
            ("name", json!("Estate Token")),
        ];
        let err =
            build_operation("tx:prepare-new-tokenization", &values(&base)).unwrap_err();
        assert!(matches!(err, BuildError::EmptyCustomChain));

        let mut with_custom = values(&base);
        with_custom.insert("customChainId".into(), json!("0x539"));
        let op = build_operation("tx:prepare-new-tokenization", &with_custom).unwrap();
        let plan = op.request_plan().unwrap();
        assert_eq!(plan.body_json().unwrap()["chainId"], "0x539");
    }

    #[test]
    fn unknown_chain_value_is_rejected() {
        let err = build_operation(
            "info:get-network-info",
            &values(&[("chainId", json!("9999"))]),
        )
        .unwrap_err();
        assert!(matches!(err, BuildError::InvalidValue { field, .. } if field == "chainId"));
    }

    #[test]
    fn unknown_operation_is_reported() {
        let err = build_operation("tx:explode", &IndexMap::new()).unwrap_err();
        assert!(matches!(err, BuildError::UnknownOperation(name) if name == "tx:explode"));
    }

    #[test]
    fn approve_builds_the_documented_body() {
        let op = build_operation(
            "tx:prepare-approve",
            &values(&[
                ("chainId", json!("aa36a7")),
                ("signerAddress", json!("0xsigner")),
                ("tokenSymbol", json!("BKN")),
                ("tokenizerEmail", json!("issuer@example.com")),
                ("spenderAddress", json!("0xspender")),
                ("tokenizerAddress", json!("0xtokenizer")),
            ]),
        )
        .unwrap();
        let plan = op.request_plan().unwrap();
        let body = plan.body_json().unwrap().as_object().unwrap();
        let mut keys: Vec<&str> = body.keys().map(|k| k.as_str()).collect();
        keys.sort_unstable();
        assert_eq!(
            keys,
            vec![
                "chainId",
                "method",
                "signerAddress",
                "spenderAddress",
                "tokenSymbol",
                "tokenizerAddress",
                "tokenizerEmail",
            ]
        );
    }

    #[test]
    fn sto_dates_must_be_rfc3339() {
        let base = values(&[
            ("chainId", json!("aa36a7")),
            ("acceptedCoin", json!("USDC")),
            ("tokenAmount", json!("1000")),
            ("offeringName", json!("Series A")),
            ("minInvestment", json!("100")),
            ("maxInvestment", json!("5000")),
            ("startDate", json!("next tuesday")),
        ]);
        let err = build_operation("tx:prepare-new-sto", &base).unwrap_err();
        assert!(matches!(err, BuildError::InvalidValue { field, .. } if field == "startDate"));

        let mut ok = base.clone();
        ok.insert("startDate".into(), json!("2026-01-15T00:00:00Z"));
        let op = build_operation("tx:prepare-new-sto", &ok).unwrap();
        let plan = op.request_plan().unwrap();
        assert_eq!(
            plan.body_json().unwrap()["startDate"],
            "2026-01-15T00:00:00Z"
        );
    }

    #[test]
    fn signed_transactions_accept_array_and_json_string() {
        let op = build_operation(
            "tx:send",
            &values(&[("signedTransactions", json!(["0xaa", "0xbb"]))]),
        )
        .unwrap();
        let plan = op.request_plan().unwrap();
        assert_eq!(plan.body_json().unwrap()["signedTransactions"], json!(["0xaa", "0xbb"]));

        let op = build_operation(
            "tx:send",
            &values(&[("signedTransactions", json!(r#"["0xcc"]"#))]),
        )
        .unwrap();
        let plan = op.request_plan().unwrap();
        assert_eq!(plan.body_json().unwrap()["signedTransactions"], json!(["0xcc"]));
    }

    #[test]
    fn collection_fields_parse_json_strings() {
        let op = build_operation(
            "tx:prepare-whitelist",
            &values(&[
                ("chainId", json!("89")),
                ("tokenSymbol", json!("BKN")),
                (
                    "userToWhitelist",
                    json!(r#"[{"whitelistStatus":"true","investorAddress":"0xinv"}]"#),
                ),
            ]),
        )
        .unwrap();
        let plan = op.request_plan().unwrap();
        let body = plan.body_json().unwrap();
        assert_eq!(body["userToWhitelist"][0]["whitelistStatus"], "true");
        assert_eq!(body["userToWhitelist"][0]["investorAddress"], "0xinv");
    }

    #[test]
    fn malformed_collection_json_is_an_error() {
        let err = build_operation(
            "tx:prepare-mint-token",
            &values(&[
                ("chainId", json!("1")),
                ("userToMint", json!("not json")),
            ]),
        )
        .unwrap_err();
        assert!(matches!(err, BuildError::InvalidValue { field, .. } if field == "userToMint"));
    }
}
