//! Typed operation model.
//!
//! Every operation the catalog declares has an explicit variant here with a
//! statically-typed parameter struct. Serde renames produce the exact wire
//! property names, so assembling a request body is a plain serialization and
//! an unset optional field can never leak into the payload.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use brickken_types::{ChainId, FormPart, FormValue, RequestPlan, TokenType};

use crate::build::BuildError;

pub const PREPARE_TRANSACTIONS_PATH: &str = "/prepare-transactions";
pub const SEND_TRANSACTIONS_PATH: &str = "/send-transactions";
pub const PATCH_TOKEN_DOCS_PATH: &str = "/patch-token-docs";

/// A fully-validated API operation, ready to be mapped to a request.
#[derive(Debug, Clone)]
pub enum Operation {
    Prepare(PrepareTransactions),
    Send(SendTransactions),
    PatchTokenDocs(PatchTokenDocs),
    Info(InfoQuery),
}

impl Operation {
    /// Map the operation to a request descriptor.
    ///
    /// This is pure: no I/O happens here, dispatch belongs to the client.
    /// Fails when a custom chain id was selected without a value.
    pub fn request_plan(&self) -> Result<RequestPlan, BuildError> {
        match self {
            Self::Prepare(prepare) => {
                if prepare.chain_id.is_empty_custom() {
                    return Err(BuildError::EmptyCustomChain);
                }
                let body = serde_json::to_value(prepare)?;
                Ok(RequestPlan::new("POST", PREPARE_TRANSACTIONS_PATH).with_json(body))
            }
            Self::Send(send) => {
                let body = serde_json::to_value(send)?;
                Ok(RequestPlan::new("POST", SEND_TRANSACTIONS_PATH).with_json(body))
            }
            Self::PatchTokenDocs(patch) => {
                Ok(RequestPlan::new("PATCH", PATCH_TOKEN_DOCS_PATH)
                    .with_multipart(patch.form_parts()))
            }
            Self::Info(query) => {
                if let Some(chain) = query.chain_id()
                    && chain.is_empty_custom()
                {
                    return Err(BuildError::EmptyCustomChain);
                }
                Ok(RequestPlan::new("GET", query.path()).with_query(query.query_pairs()))
            }
        }
    }
}

/// Parameters for `POST /prepare-transactions`.
///
/// The body always carries the chain id and a `method` discriminator followed
/// by the method's own fields.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PrepareTransactions {
    pub chain_id: ChainId,
    #[serde(flatten)]
    pub method: PrepareMethod,
}

/// Transaction method to prepare, with its method-specific parameters.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "method", rename_all = "camelCase")]
pub enum PrepareMethod {
    NewTokenization(NewTokenization),
    NewSto(NewSto),
    NewInvest(NewInvest),
    ClaimTokens(ClaimTokens),
    CloseOffer(CloseOffer),
    MintToken(MintToken),
    Whitelist(Whitelist),
    BurnToken(BurnToken),
    TransferFrom(TransferFrom),
    TransferTo(TransferTo),
    Approve(Approve),
    DividendDistribution(DividendDistribution),
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTokenization {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signer_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_symbol: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tokenizer_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Full name of the token. The only always-required field of this method.
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supply_cap: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_type: Option<TokenType>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub pre_mints: Vec<PreMint>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub initial_holders: Vec<InitialHolder>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSto {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signer_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_symbol: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tokenizer_email: Option<String>,
    pub accepted_coin: String,
    pub token_amount: String,
    pub offering_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<DateTime<Utc>>,
    #[serde(rename = "minRaiseUSD", skip_serializing_if = "Option::is_none")]
    pub min_raise_usd: Option<String>,
    #[serde(rename = "maxRaiseUSD", skip_serializing_if = "Option::is_none")]
    pub max_raise_usd: Option<String>,
    pub min_investment: String,
    pub max_investment: String,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewInvest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub investor_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_symbol: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_token_symbol: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub investor_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimTokens {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub investor_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_symbol: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_token_symbol: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub investor_email: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CloseOffer {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signer_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_symbol: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tokenizer_email: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MintToken {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signer_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_symbol: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub user_to_mint: Vec<MintRecipient>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Whitelist {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signer_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_symbol: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub investor_email: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub user_to_whitelist: Vec<WhitelistEntry>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BurnToken {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signer_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_symbol: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub investor_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferFrom {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signer_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_symbol: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferTo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signer_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_symbol: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Approve {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signer_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_symbol: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tokenizer_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spender_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tokenizer_address: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DividendDistribution {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signer_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_symbol: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<String>,
}

/// Pre-mint allocation applied during tokenization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreMint {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<String>,
}

/// Initial token holder with a percentage allocation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitialHolder {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wallet_address: Option<String>,
}

/// Recipient of a mint operation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MintRecipient {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub investor_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub investor_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub need_kyc: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub need_whitelist: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub surname: Option<String>,
}

/// Whitelist change for a single investor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WhitelistEntry {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub whitelist_status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub investor_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub investor_email: Option<String>,
}

/// Parameters for `POST /send-transactions`.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SendTransactions {
    /// Signed transaction hex strings, in the order they were prepared.
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub signed_transactions: Vec<String>,
    /// Transaction id returned by the prepare call.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tx_id: Option<String>,
}

/// Parameters for `PATCH /patch-token-docs` (multipart form).
#[derive(Debug, Clone)]
pub struct PatchTokenDocs {
    pub token_symbol: String,
    pub token_logotype: Option<PathBuf>,
    pub subscription_agreement: Option<PathBuf>,
    pub legal_docs: Option<PathBuf>,
}

impl PatchTokenDocs {
    fn form_parts(&self) -> Vec<FormPart> {
        let mut parts = vec![FormPart {
            name: "tokenSymbol".into(),
            value: FormValue::Text(self.token_symbol.clone()),
        }];
        for (name, path) in [
            ("tokenLogotype", &self.token_logotype),
            ("subscriptionAgreement", &self.subscription_agreement),
            ("legalDocs", &self.legal_docs),
        ] {
            if let Some(path) = path {
                parts.push(FormPart {
                    name: name.into(),
                    value: FormValue::File(path.clone()),
                });
            }
        }
        parts
    }
}

/// A read-only lookup, always issued as `GET` with query-string parameters.
#[derive(Debug, Clone)]
pub enum InfoQuery {
    TransactionStatus {
        hash: String,
    },
    TokenInfo {
        token_symbol: String,
        chain_id: ChainId,
    },
    BalanceWhitelist {
        token_symbol: String,
        investor_email: String,
    },
    Allowance {
        token_symbol: String,
        spender_address: String,
        owner_address: String,
    },
    TokenizerInfo {
        token_symbol: String,
    },
    WhitelistStatus {
        token_symbol: String,
        investor_address: String,
    },
    DividendDistributionInfo {
        token_symbol: String,
    },
    InvestmentsByStoId {
        token_symbol: String,
        id: String,
    },
    InvestorInfo {
        token_symbol: String,
        email: String,
    },
    StoBalance {
        token_symbol: String,
        id: String,
    },
    StoById {
        token_symbol: String,
        id: String,
    },
    Stos {
        token_symbol: String,
    },
    NetworkInfo {
        chain_id: ChainId,
    },
}

impl InfoQuery {
    pub fn path(&self) -> &'static str {
        match self {
            Self::TransactionStatus { .. } => "/get-transaction-status",
            Self::TokenInfo { .. } => "/get-token-info",
            Self::BalanceWhitelist { .. } => "/get-balance-whitelist",
            Self::Allowance { .. } => "/get-allowance",
            Self::TokenizerInfo { .. } => "/get-tokenizer-info",
            Self::WhitelistStatus { .. } => "/get-whitelist-status",
            Self::DividendDistributionInfo { .. } => "/get-dividend-distribution",
            Self::InvestmentsByStoId { .. } => "/get-investments-by-sto-id",
            Self::InvestorInfo { .. } => "/get-investor-info",
            Self::StoBalance { .. } => "/get-sto-balance",
            Self::StoById { .. } => "/get-sto-by-id",
            Self::Stos { .. } => "/get-stos",
            Self::NetworkInfo { .. } => "/get-network-info",
        }
    }

    /// Query pairs in declaration order.
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        fn pair(name: &str, value: &str) -> (String, String) {
            (name.to_string(), value.to_string())
        }
        match self {
            Self::TransactionStatus { hash } => vec![pair("hash", hash)],
            Self::TokenInfo {
                token_symbol,
                chain_id,
            } => vec![
                pair("tokenSymbol", token_symbol),
                pair("chainId", chain_id.wire_value()),
            ],
            Self::BalanceWhitelist {
                token_symbol,
                investor_email,
            } => vec![
                pair("tokenSymbol", token_symbol),
                pair("investorEmail", investor_email),
            ],
            Self::Allowance {
                token_symbol,
                spender_address,
                owner_address,
            } => vec![
                pair("tokenSymbol", token_symbol),
                pair("spenderAddress", spender_address),
                pair("ownerAddress", owner_address),
            ],
            Self::TokenizerInfo { token_symbol } => vec![pair("tokenSymbol", token_symbol)],
            Self::WhitelistStatus {
                token_symbol,
                investor_address,
            } => vec![
                pair("tokenSymbol", token_symbol),
                pair("investorAddress", investor_address),
            ],
            Self::DividendDistributionInfo { token_symbol } => {
                vec![pair("tokenSymbol", token_symbol)]
            }
            Self::InvestmentsByStoId { token_symbol, id } => {
                vec![pair("tokenSymbol", token_symbol), pair("id", id)]
            }
            Self::InvestorInfo {
                token_symbol,
                email,
            } => vec![pair("tokenSymbol", token_symbol), pair("email", email)],
            Self::StoBalance { token_symbol, id } => {
                vec![pair("tokenSymbol", token_symbol), pair("id", id)]
            }
            Self::StoById { token_symbol, id } => {
                vec![pair("tokenSymbol", token_symbol), pair("id", id)]
            }
            Self::Stos { token_symbol } => vec![pair("tokenSymbol", token_symbol)],
            Self::NetworkInfo { chain_id } => vec![pair("chainId", chain_id.wire_value())],
        }
    }

    fn chain_id(&self) -> Option<&ChainId> {
        match self {
            Self::TokenInfo { chain_id, .. } | Self::NetworkInfo { chain_id } => Some(chain_id),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn body_keys(value: &serde_json::Value) -> Vec<&str> {
        let mut keys: Vec<&str> = value.as_object().unwrap().keys().map(|k| k.as_str()).collect();
        keys.sort_unstable();
        keys
    }

    #[test]
    fn approve_body_contains_exactly_the_set_fields() {
        let op = Operation::Prepare(PrepareTransactions {
            chain_id: ChainId::Sepolia,
            method: PrepareMethod::Approve(Approve {
                signer_address: Some("0xsigner".into()),
                token_symbol: Some("BKN".into()),
                tokenizer_email: Some("issuer@example.com".into()),
                amount: None,
                spender_address: Some("0xspender".into()),
                tokenizer_address: Some("0xtokenizer".into()),
            }),
        });
        let plan = op.request_plan().unwrap();
        assert_eq!(plan.method, "POST");
        assert_eq!(plan.path, PREPARE_TRANSACTIONS_PATH);
        let body = plan.body_json().unwrap();
        assert_eq!(
            body_keys(body),
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
        assert_eq!(body["method"], "approve");
        assert_eq!(body["chainId"], "aa36a7");
        assert_eq!(body["tokenizerAddress"], "0xtokenizer");
    }

    #[test]
    fn method_tags_use_the_wire_spelling() {
        let cases: [(PrepareMethod, &str); 4] = [
            (
                PrepareMethod::NewTokenization(NewTokenization {
                    name: "Estate".into(),
                    ..Default::default()
                }),
                "newTokenization",
            ),
            (PrepareMethod::Whitelist(Whitelist::default()), "whitelist"),
            (PrepareMethod::BurnToken(BurnToken::default()), "burnToken"),
            (
                PrepareMethod::DividendDistribution(DividendDistribution::default()),
                "dividendDistribution",
            ),
        ];
        for (method, tag) in cases {
            let body = serde_json::to_value(&method).unwrap();
            assert_eq!(body["method"], tag, "wrong tag for {tag}");
        }
    }

    #[test]
    fn custom_chain_value_lands_under_chain_id() {
        let op = Operation::Prepare(PrepareTransactions {
            chain_id: ChainId::Custom("0x539".into()),
            method: PrepareMethod::CloseOffer(CloseOffer::default()),
        });
        let plan = op.request_plan().unwrap();
        assert_eq!(plan.body_json().unwrap()["chainId"], "0x539");
    }

    #[test]
    fn empty_custom_chain_is_rejected() {
        let op = Operation::Prepare(PrepareTransactions {
            chain_id: ChainId::Custom(String::new()),
            method: PrepareMethod::CloseOffer(CloseOffer::default()),
        });
        assert!(matches!(op.request_plan(), Err(BuildError::EmptyCustomChain)));

        let op = Operation::Info(InfoQuery::NetworkInfo {
            chain_id: ChainId::Custom("  ".into()),
        });
        assert!(matches!(op.request_plan(), Err(BuildError::EmptyCustomChain)));
    }

    #[test]
    fn allowance_query_lists_parameters_in_order() {
        let op = Operation::Info(InfoQuery::Allowance {
            token_symbol: "BKN".into(),
            spender_address: "0xspender".into(),
            owner_address: "0xowner".into(),
        });
        let plan = op.request_plan().unwrap();
        assert_eq!(plan.method, "GET");
        assert_eq!(plan.path, "/get-allowance");
        assert_eq!(
            plan.query,
            vec![
                ("tokenSymbol".to_string(), "BKN".to_string()),
                ("spenderAddress".to_string(), "0xspender".to_string()),
                ("ownerAddress".to_string(), "0xowner".to_string()),
            ]
        );
        assert!(plan.body.is_none());
    }

    #[test]
    fn token_info_routes_chain_id_through_the_query_string() {
        let op = Operation::Info(InfoQuery::TokenInfo {
            token_symbol: "BKN".into(),
            chain_id: ChainId::PolygonMainnet,
        });
        let plan = op.request_plan().unwrap();
        assert!(plan.body.is_none());
        assert_eq!(
            plan.query,
            vec![
                ("tokenSymbol".to_string(), "BKN".to_string()),
                ("chainId".to_string(), "89".to_string()),
            ]
        );
    }

    #[test]
    fn unset_optional_fields_never_reach_the_body() {
        let op = Operation::Prepare(PrepareTransactions {
            chain_id: ChainId::Sepolia,
            method: PrepareMethod::BurnToken(BurnToken {
                token_symbol: Some("BKN".into()),
                ..Default::default()
            }),
        });
        let body = op.request_plan().unwrap();
        let body = body.body_json().unwrap();
        assert_eq!(body_keys(body), vec!["chainId", "method", "tokenSymbol"]);
    }

    #[test]
    fn new_sto_renames_the_usd_bounds() {
        let sto = NewSto {
            signer_address: None,
            token_symbol: Some("BKN".into()),
            tokenizer_email: None,
            accepted_coin: "USDC".into(),
            token_amount: "1000".into(),
            offering_name: "Series A".into(),
            start_date: None,
            end_date: None,
            min_raise_usd: Some("50000".into()),
            max_raise_usd: Some("250000".into()),
            min_investment: "100".into(),
            max_investment: "5000".into(),
        };
        let body = serde_json::to_value(PrepareMethod::NewSto(sto)).unwrap();
        assert_eq!(body["minRaiseUSD"], "50000");
        assert_eq!(body["maxRaiseUSD"], "250000");
        assert!(body.get("minRaiseUsd").is_none());
    }

    #[test]
    fn send_transactions_serializes_the_signed_array() {
        let op = Operation::Send(SendTransactions {
            signed_transactions: vec!["0xdead".into(), "0xbeef".into()],
            tx_id: Some("tx-1".into()),
        });
        let plan = op.request_plan().unwrap();
        assert_eq!(plan.path, SEND_TRANSACTIONS_PATH);
        let body = plan.body_json().unwrap();
        assert_eq!(body["signedTransactions"], json!(["0xdead", "0xbeef"]));
        assert_eq!(body["txId"], "tx-1");
    }

    #[test]
    fn patch_token_docs_builds_multipart_parts() {
        let op = Operation::PatchTokenDocs(PatchTokenDocs {
            token_symbol: "BKN".into(),
            token_logotype: Some(PathBuf::from("logo.png")),
            subscription_agreement: None,
            legal_docs: Some(PathBuf::from("legal.pdf")),
        });
        let plan = op.request_plan().unwrap();
        assert_eq!(plan.method, "PATCH");
        let Some(brickken_types::RequestBody::Multipart(parts)) = &plan.body else {
            panic!("expected multipart body");
        };
        let names: Vec<&str> = parts.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["tokenSymbol", "tokenLogotype", "legalDocs"]);
        assert_eq!(parts[0].value, FormValue::Text("BKN".into()));
        assert_eq!(parts[1].value, FormValue::File(PathBuf::from("logo.png")));
    }

    #[test]
    fn mint_recipients_round_trip_from_json() {
        let raw = json!([{
            "amount": "10",
            "investorAddress": "0xinv",
            "needKyc": true
        }]);
        let recipients: Vec<MintRecipient> = serde_json::from_value(raw).unwrap();
        assert_eq!(recipients[0].amount.as_deref(), Some("10"));
        assert_eq!(recipients[0].need_kyc, Some(true));
        assert!(recipients[0].surname.is_none());

        let body = serde_json::to_value(PrepareMethod::MintToken(MintToken {
            signer_address: None,
            token_symbol: Some("BKN".into()),
            user_to_mint: recipients,
        }))
        .unwrap();
        assert_eq!(body["userToMint"][0]["investorAddress"], "0xinv");
    }
}
