use std::time::Duration;

use alloy_primitives::Address;
use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::error::VerifyError;
use crate::explorer::{Explorer, VerifyRequest};

/// Etherscan-compatible verification endpoint.
///
/// Submits flattened single-file source and classifies the response text,
/// since the API reports indexing lag and duplicate verification as plain
/// `status: "0"` errors.
pub struct EtherscanExplorer {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    status: String,
    message: String,
    result: String,
}

impl EtherscanExplorer {
    pub fn new(
        api_url: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Result<Self, VerifyError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self {
            client,
            api_url: api_url.into(),
            api_key: api_key.into(),
        })
    }
}

#[async_trait]
impl Explorer for EtherscanExplorer {
    async fn verify(&self, request: &VerifyRequest) -> Result<(), VerifyError> {
        let address = format!("0x{}", hex::encode(request.address));
        let mut form = vec![
            ("apikey", self.api_key.as_str()),
            ("module", "contract"),
            ("action", "verifysourcecode"),
            ("codeformat", "solidity-singlefile"),
            ("contractaddress", address.as_str()),
            ("contractname", request.contract_name.as_str()),
            ("sourceCode", request.source.as_str()),
            ("compilerversion", request.compiler_version.as_str()),
        ];
        if let Some(args) = &request.constructor_args {
            // The API really does spell the field this way.
            form.push(("constructorArguements", args.as_str()));
        }

        let response: ApiResponse = self
            .client
            .post(&self.api_url)
            .form(&form)
            .send()
            .await?
            .json()
            .await
            .map_err(|e| VerifyError::MalformedResponse(e.to_string()))?;

        if response.status == "1" {
            debug!(address = %request.address, guid = %response.result, "verification submitted");
            return Ok(());
        }
        Err(classify(request.address, &response.result, &response.message))
    }
}

fn classify(address: Address, result: &str, message: &str) -> VerifyError {
    let lowered = result.to_ascii_lowercase();
    if lowered.contains("already verified") {
        VerifyError::AlreadyVerified { address }
    } else if lowered.contains("unable to locate contractcode")
        || lowered.contains("does not have bytecode")
    {
        VerifyError::NotIndexed { address }
    } else if result.is_empty() {
        VerifyError::Rejected(message.to_string())
    } else {
        VerifyError::Rejected(result.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classification_spots_the_known_failure_texts() {
        let address = Address::repeat_byte(1);

        let err = classify(address, "Contract source code already verified", "NOTOK");
        assert!(matches!(err, VerifyError::AlreadyVerified { .. }));

        let err = classify(
            address,
            "Unable to locate ContractCode at 0x0101010101010101010101010101010101010101",
            "NOTOK",
        );
        assert!(matches!(err, VerifyError::NotIndexed { .. }));

        let err = classify(address, "Invalid API Key", "NOTOK");
        assert!(matches!(err, VerifyError::Rejected(reason) if reason == "Invalid API Key"));

        // An empty result falls back to the outer message.
        let err = classify(address, "", "NOTOK");
        assert!(matches!(err, VerifyError::Rejected(reason) if reason == "NOTOK"));
    }
}
