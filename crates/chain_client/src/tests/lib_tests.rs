use super::*;
use httpmock::prelude::*;
use serde_json::json;

const TOKEN: &str = "0x029263aa1be88127f1794780d9eef453221c2f30";
const RECIPIENT: &str = "0xF54f4815f62ccC360963329789d62d3497A121Ae";

fn account() -> LocalAccount {
    LocalAccount::from_private_key(
        "0x4c0883a69102937d6231471b5dbb6204fe5129617082792ae468d01a3f362318",
    )
    .expect("account")
}

fn mint_call() -> ContractCall {
    ContractCall::mint(
        Address::from_str(TOKEN).expect("token"),
        Address::from_str(RECIPIENT).expect("recipient"),
        U256::from(1u64),
    )
}

fn rpc_result(result: serde_json::Value) -> serde_json::Value {
    json!({ "jsonrpc": "2.0", "id": 1, "result": result })
}

fn rpc_error(message: &str) -> serde_json::Value {
    json!({ "jsonrpc": "2.0", "id": 1, "error": { "code": -32000, "message": message } })
}

#[tokio::test]
async fn simulation_returns_call_result_and_request() {
    let server = MockServer::start_async().await;
    let call = server
        .mock_async(|when, then| {
            when.method(POST).path("/").body_contains("\"eth_call\"");
            then.status(200).json_body(rpc_result(json!("0x")));
        })
        .await;

    let client = RpcChainClient::new(server.url("/"), SEPOLIA_CHAIN_ID);
    let simulation = client
        .simulate_contract(mint_call(), &account())
        .await
        .expect("simulate");

    call.assert_async().await;
    assert!(simulation.result.is_empty());
    assert_eq!(simulation.request.to, Address::from_str(TOKEN).expect("token"));
    assert_eq!(simulation.request.data, mint_call().calldata);
    assert_eq!(simulation.request.account.address(), account().address());
}

#[tokio::test]
async fn reverted_simulation_is_contract_execution_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/").body_contains("\"eth_call\"");
            then.status(200)
                .json_body(rpc_error("execution reverted: caller is not a minter"));
        })
        .await;

    let client = RpcChainClient::new(server.url("/"), SEPOLIA_CHAIN_ID);
    let err = client
        .simulate_contract(mint_call(), &account())
        .await
        .expect_err("revert");
    assert!(matches!(err, ChainError::ContractExecution { .. }));
    assert!(!err.is_gas_exhausted());
}

#[tokio::test]
async fn gas_estimation_failure_is_gas_exhausted() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/").body_contains("\"eth_estimateGas\"");
            then.status(200)
                .json_body(rpc_error("gas required exceeds allowance (0)"));
        })
        .await;

    let client = RpcChainClient::new(server.url("/"), SEPOLIA_CHAIN_ID);
    let request = TransactionRequest {
        account: account(),
        to: Address::from_str(TOKEN).expect("token"),
        data: mint_call().calldata,
        value: U256::ZERO,
    };
    let err = client.write_contract(request).await.expect_err("no gas");
    assert!(err.is_gas_exhausted(), "{err}");
}

#[tokio::test]
async fn write_signs_and_sends_raw_transaction() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/").body_contains("\"eth_estimateGas\"");
            then.status(200).json_body(rpc_result(json!("0xb411")));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/")
                .body_contains("\"eth_getTransactionCount\"")
                .body_contains("pending");
            then.status(200).json_body(rpc_result(json!("0x3")));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/").body_contains("\"eth_gasPrice\"");
            then.status(200).json_body(rpc_result(json!("0x3b9aca00")));
        })
        .await;
    let send = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/")
                .body_contains("\"eth_sendRawTransaction\"");
            then.status(200).json_body(rpc_result(json!(
                "0x5c504ed432cb51138bcf09aa5e8a410dd4a1e204ef84bfed1be16dfba1b22060"
            )));
        })
        .await;

    let client = RpcChainClient::new(server.url("/"), SEPOLIA_CHAIN_ID);
    let request = TransactionRequest {
        account: account(),
        to: Address::from_str(TOKEN).expect("token"),
        data: mint_call().calldata,
        value: U256::ZERO,
    };
    let hash = client.write_contract(request).await.expect("send");

    send.assert_async().await;
    assert_eq!(
        hash,
        TxHash::from_str("0x5c504ed432cb51138bcf09aa5e8a410dd4a1e204ef84bfed1be16dfba1b22060")
            .expect("hash")
    );
}

#[test]
fn only_transaction_errors_with_gas_prefix_are_gas_exhausted() {
    let gas = ChainError::Rpc {
        code: -32000,
        message: "gas required exceeds allowance (21000)".into(),
    };
    assert!(!gas.is_gas_exhausted());
    assert!(ChainError::Rpc {
        code: -32000,
        message: "gas required exceeds allowance (21000)".into(),
    }
    .during_transaction()
    .is_gas_exhausted());
    assert!(!ChainError::TransactionExecution {
        details: "insufficient funds for gas * price + value".into(),
    }
    .is_gas_exhausted());
}
