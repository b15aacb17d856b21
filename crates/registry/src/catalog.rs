//! The built-in operation catalog.
//!
//! Every operation the API exposes is listed here as an explicit entry with a
//! statically-known field set. The CLI derives its command tree from this
//! table, and the mapper in [`crate::build`] consumes the same field names.

use brickken_types::{ChainId, FieldKind, FieldSpec, OperationSpec, TokenType};

/// The full set of operations, grouped by resource.
#[derive(Debug, Clone)]
pub struct Catalog {
    operations: Vec<OperationSpec>,
}

impl Catalog {
    /// Build the catalog of all supported operations.
    pub fn builtin() -> Self {
        let mut operations = Vec::with_capacity(27);
        operations.extend(transaction_operations());
        operations.extend(info_operations());
        Self { operations }
    }

    pub fn operations(&self) -> &[OperationSpec] {
        &self.operations
    }

    /// Distinct group names, in catalog order.
    pub fn groups(&self) -> Vec<&str> {
        let mut groups: Vec<&str> = Vec::new();
        for op in &self.operations {
            if !groups.contains(&op.group.as_str()) {
                groups.push(&op.group);
            }
        }
        groups
    }

    pub fn find(&self, group: &str, action: &str) -> Option<&OperationSpec> {
        self.operations
            .iter()
            .find(|op| op.group == group && op.action() == action)
    }

    pub fn find_by_name(&self, name: &str) -> Option<&OperationSpec> {
        self.operations.iter().find(|op| op.name == name)
    }
}

fn chain_fields() -> [FieldSpec; 2] {
    let mut values: Vec<String> = ChainId::KNOWN.iter().map(|v| v.to_string()).collect();
    values.push(ChainId::CUSTOM.to_string());
    [
        FieldSpec::enumerated("chainId", values)
            .required()
            .default_value(ChainId::default().wire_value())
            .describe("Chain the transaction targets"),
        FieldSpec::string("customChainId")
            .describe("Chain id to use when chainId is 'custom'"),
    ]
}

fn token_symbol() -> FieldSpec {
    FieldSpec::string("tokenSymbol")
        .sensitive()
        .describe("Symbol of the token")
}

fn signer_address() -> FieldSpec {
    FieldSpec::string("signerAddress").describe("Address that signs the transaction")
}

fn tokenizer_email() -> FieldSpec {
    FieldSpec::string("tokenizerEmail")
        .sensitive()
        .describe("Email of the tokenizer")
}

fn prepare(action: &str, summary: &str, fields: Vec<FieldSpec>) -> OperationSpec {
    let mut all = Vec::with_capacity(fields.len() + 2);
    all.extend(chain_fields());
    all.extend(fields);
    OperationSpec {
        group: "tx".into(),
        name: format!("tx:{action}"),
        summary: summary.into(),
        method: "POST".into(),
        path: crate::operation::PREPARE_TRANSACTIONS_PATH.into(),
        multipart: false,
        fields: all,
    }
}

fn transaction_operations() -> Vec<OperationSpec> {
    vec![
        prepare(
            "prepare-new-tokenization",
            "Prepare a new token creation transaction",
            vec![
                signer_address(),
                token_symbol(),
                tokenizer_email(),
                FieldSpec::string("url").describe("URL associated with the token"),
                FieldSpec::string("name")
                    .required()
                    .describe("Full name of the token"),
                FieldSpec::string("supplyCap")
                    .default_value("0")
                    .describe("Maximum token supply, 0 for uncapped"),
                FieldSpec::enumerated("tokenType", TokenType::KNOWN)
                    .describe("Asset class of the token"),
                FieldSpec::new("preMints", FieldKind::Json)
                    .describe("JSON array of pre-mint allocations"),
                FieldSpec::new("initialHolders", FieldKind::Json)
                    .describe("JSON array of initial holders"),
            ],
        ),
        prepare(
            "prepare-new-sto",
            "Prepare a new security token offering",
            vec![
                signer_address(),
                token_symbol(),
                tokenizer_email(),
                FieldSpec::string("acceptedCoin")
                    .required()
                    .describe("Coin accepted as payment"),
                FieldSpec::string("tokenAmount")
                    .required()
                    .sensitive()
                    .describe("Amount of tokens offered"),
                FieldSpec::string("offeringName")
                    .required()
                    .describe("Name of the offering"),
                FieldSpec::new("startDate", FieldKind::DateTime)
                    .describe("Offering start, RFC 3339"),
                FieldSpec::new("endDate", FieldKind::DateTime).describe("Offering end, RFC 3339"),
                FieldSpec::string("minRaiseUSD").describe("Minimum raise in USD"),
                FieldSpec::string("maxRaiseUSD").describe("Maximum raise in USD"),
                FieldSpec::string("minInvestment")
                    .required()
                    .describe("Minimum investment per investor"),
                FieldSpec::string("maxInvestment")
                    .required()
                    .describe("Maximum investment per investor"),
            ],
        ),
        prepare(
            "prepare-new-invest",
            "Prepare an investment transaction",
            vec![
                FieldSpec::string("investorAddress").describe("Address of the investor"),
                token_symbol(),
                FieldSpec::string("paymentTokenSymbol")
                    .sensitive()
                    .describe("Symbol of the payment token"),
                FieldSpec::string("investorEmail").describe("Email of the investor"),
                FieldSpec::string("amount").describe("Amount to invest"),
            ],
        ),
        prepare(
            "prepare-claim-tokens",
            "Prepare a token claim transaction",
            vec![
                FieldSpec::string("investorAddress").describe("Address of the investor"),
                token_symbol(),
                FieldSpec::string("paymentTokenSymbol")
                    .sensitive()
                    .describe("Symbol of the payment token"),
                FieldSpec::string("investorEmail").describe("Email of the investor"),
            ],
        ),
        prepare(
            "prepare-close-offer",
            "Prepare a transaction that closes an offering",
            vec![signer_address(), token_symbol(), tokenizer_email()],
        ),
        prepare(
            "prepare-mint-token",
            "Prepare a mint transaction",
            vec![
                signer_address(),
                token_symbol(),
                FieldSpec::new("userToMint", FieldKind::Json)
                    .describe("JSON array of mint recipients"),
            ],
        ),
        prepare(
            "prepare-whitelist",
            "Prepare a whitelist update transaction",
            vec![
                signer_address(),
                token_symbol(),
                FieldSpec::string("investorEmail").describe("Email of the investor"),
                FieldSpec::new("userToWhitelist", FieldKind::Json)
                    .describe("JSON array of whitelist changes"),
            ],
        ),
        prepare(
            "prepare-burn-token",
            "Prepare a burn transaction",
            vec![
                signer_address(),
                token_symbol(),
                FieldSpec::string("investorEmail").describe("Email of the investor"),
                FieldSpec::string("amount").describe("Amount to burn"),
            ],
        ),
        prepare(
            "prepare-transfer-from",
            "Prepare a transfer-from transaction",
            vec![
                signer_address(),
                token_symbol(),
                FieldSpec::string("amount").describe("Amount to transfer"),
                FieldSpec::string("from").describe("Address tokens are moved from"),
                FieldSpec::string("to").describe("Address tokens are moved to"),
            ],
        ),
        prepare(
            "prepare-transfer-to",
            "Prepare a transfer transaction",
            vec![
                signer_address(),
                token_symbol(),
                FieldSpec::string("amount").describe("Amount to transfer"),
                FieldSpec::string("to").describe("Address tokens are moved to"),
            ],
        ),
        prepare(
            "prepare-approve",
            "Prepare an allowance approval transaction",
            vec![
                signer_address(),
                token_symbol(),
                tokenizer_email(),
                FieldSpec::string("amount").describe("Allowance amount"),
                FieldSpec::string("spenderAddress").describe("Address being approved"),
                FieldSpec::string("tokenizerAddress")
                    .sensitive()
                    .describe("Address of the tokenizer"),
            ],
        ),
        prepare(
            "prepare-dividend-distribution",
            "Prepare a dividend distribution transaction",
            vec![
                signer_address(),
                token_symbol(),
                FieldSpec::string("amount").describe("Amount to distribute"),
            ],
        ),
        OperationSpec {
            group: "tx".into(),
            name: "tx:send".into(),
            summary: "Send previously prepared, signed transactions".into(),
            method: "POST".into(),
            path: crate::operation::SEND_TRANSACTIONS_PATH.into(),
            multipart: false,
            fields: vec![
                FieldSpec::new("signedTransactions", FieldKind::Array)
                    .describe("Signed transaction hex strings, repeatable"),
                FieldSpec::string("txId").describe("Transaction id from the prepare call"),
            ],
        },
        OperationSpec {
            group: "tx".into(),
            name: "tx:patch-token-docs".into(),
            summary: "Upload or replace token documents".into(),
            method: "PATCH".into(),
            path: crate::operation::PATCH_TOKEN_DOCS_PATH.into(),
            multipart: true,
            fields: vec![
                token_symbol().required(),
                FieldSpec::new("tokenLogotype", FieldKind::File)
                    .sensitive()
                    .describe("Path to the token logotype image"),
                FieldSpec::new("subscriptionAgreement", FieldKind::File)
                    .describe("Path to the subscription agreement document"),
                FieldSpec::new("legalDocs", FieldKind::File)
                    .describe("Path to the legal documents file"),
            ],
        },
    ]
}

fn info(action: &str, path: &str, summary: &str, fields: Vec<FieldSpec>) -> OperationSpec {
    OperationSpec {
        group: "info".into(),
        name: format!("info:{action}"),
        summary: summary.into(),
        method: "GET".into(),
        path: path.into(),
        multipart: false,
        fields,
    }
}

fn info_operations() -> Vec<OperationSpec> {
    vec![
        info(
            "get-transaction-status",
            "/get-transaction-status",
            "Look up the status of a transaction by hash",
            vec![
                FieldSpec::string("hash")
                    .required()
                    .describe("Transaction hash"),
            ],
        ),
        info(
            "get-token-info",
            "/get-token-info",
            "Fetch token details",
            {
                let mut fields = vec![token_symbol().required()];
                fields.extend(chain_fields());
                fields
            },
        ),
        info(
            "get-balance-whitelist",
            "/get-balance-whitelist",
            "Fetch an investor's balance and whitelist state",
            vec![
                token_symbol().required(),
                FieldSpec::string("investorEmail")
                    .required()
                    .describe("Email of the investor"),
            ],
        ),
        info(
            "get-allowance",
            "/get-allowance",
            "Fetch a spender's allowance",
            vec![
                token_symbol().required(),
                FieldSpec::string("spenderAddress")
                    .required()
                    .describe("Address of the spender"),
                FieldSpec::string("ownerAddress")
                    .required()
                    .describe("Address of the owner"),
            ],
        ),
        info(
            "get-tokenizer-info",
            "/get-tokenizer-info",
            "Fetch tokenizer details",
            vec![token_symbol().required()],
        ),
        info(
            "get-whitelist-status",
            "/get-whitelist-status",
            "Fetch an investor's whitelist status",
            vec![
                token_symbol().required(),
                FieldSpec::string("investorAddress")
                    .required()
                    .describe("Address of the investor"),
            ],
        ),
        info(
            "get-dividend-distribution",
            "/get-dividend-distribution",
            "Fetch dividend distribution details",
            vec![token_symbol().required()],
        ),
        info(
            "get-investments-by-sto-id",
            "/get-investments-by-sto-id",
            "List investments of an offering",
            vec![
                token_symbol().required(),
                FieldSpec::string("id").required().describe("Offering id"),
            ],
        ),
        info(
            "get-investor-info",
            "/get-investor-info",
            "Fetch investor details",
            vec![
                token_symbol().required(),
                FieldSpec::string("email")
                    .required()
                    .describe("Email of the investor"),
            ],
        ),
        info(
            "get-sto-balance",
            "/get-sto-balance",
            "Fetch the remaining balance of an offering",
            vec![
                token_symbol().required(),
                FieldSpec::string("id").required().describe("Offering id"),
            ],
        ),
        info(
            "get-sto-by-id",
            "/get-sto-by-id",
            "Fetch an offering by id",
            vec![
                token_symbol().required(),
                FieldSpec::string("id").required().describe("Offering id"),
            ],
        ),
        info(
            "get-stos",
            "/get-stos",
            "List offerings of a token",
            vec![token_symbol().required()],
        ),
        info(
            "get-network-info",
            "/get-network-info",
            "Fetch network details for a chain",
            chain_fields().to_vec(),
        ),
    ]
}
