//! Solidity bindings shared by signing and calldata encoding.
//!
//! `RelayRequest` is the flattened EIP-712 type the forwarder hashes;
//! `RelayCallRequest` is the nested tuple `RelayHub.relayCall` takes.

use alloy_sol_types::sol;

/// Length of an r || s || v signature.
pub const SIGNATURE_LENGTH: usize = 65;

sol! {
    #[derive(Debug, PartialEq, Eq)]
    struct ForwardRequest {
        address from;
        address to;
        uint256 value;
        uint256 gas;
        uint256 nonce;
        bytes data;
        uint256 validUntilTime;
    }

    #[derive(Debug, PartialEq, Eq)]
    struct RelayData {
        uint256 maxFeePerGas;
        uint256 maxPriorityFeePerGas;
        uint256 transactionCalldataGasUsed;
        address relayWorker;
        address paymaster;
        address forwarder;
        bytes paymasterData;
        uint256 clientId;
    }

    #[derive(Debug, PartialEq, Eq)]
    struct RelayRequest {
        address from;
        address to;
        uint256 value;
        uint256 gas;
        uint256 nonce;
        bytes data;
        uint256 validUntilTime;
        RelayData relayData;
    }

    #[derive(Debug, PartialEq, Eq)]
    struct RelayCallRequest {
        ForwardRequest request;
        RelayData relayData;
    }

    interface IRelayHub {
        function relayCall(
            string domainSeparatorName,
            uint256 maxAcceptanceBudget,
            RelayCallRequest relayRequest,
            bytes signature,
            bytes approvalData
        ) external returns (bool paymasterAccepted, uint256 charge, bytes returnValue);
    }

    interface ITokenFaucet {
        function claim() external returns (bool);
    }
}

impl From<&crate::ForwardRequest> for ForwardRequest {
    fn from(request: &crate::ForwardRequest) -> Self {
        Self {
            from: request.from,
            to: request.to,
            value: request.value,
            gas: request.gas,
            nonce: request.nonce,
            data: request.data.clone(),
            validUntilTime: request.valid_until_time,
        }
    }
}

impl From<&crate::RelayData> for RelayData {
    fn from(relay_data: &crate::RelayData) -> Self {
        Self {
            maxFeePerGas: relay_data.max_fee_per_gas,
            maxPriorityFeePerGas: relay_data.max_priority_fee_per_gas,
            transactionCalldataGasUsed: relay_data.transaction_calldata_gas_used,
            relayWorker: relay_data.relay_worker,
            paymaster: relay_data.paymaster,
            forwarder: relay_data.forwarder,
            paymasterData: relay_data.paymaster_data.clone(),
            clientId: relay_data.client_id,
        }
    }
}

impl From<&crate::RelayRequest> for RelayRequest {
    fn from(relay_request: &crate::RelayRequest) -> Self {
        let request = &relay_request.request;
        Self {
            from: request.from,
            to: request.to,
            value: request.value,
            gas: request.gas,
            nonce: request.nonce,
            data: request.data.clone(),
            validUntilTime: request.valid_until_time,
            relayData: (&relay_request.relay_data).into(),
        }
    }
}

impl From<&crate::RelayRequest> for RelayCallRequest {
    fn from(relay_request: &crate::RelayRequest) -> Self {
        Self {
            request: (&relay_request.request).into(),
            relayData: (&relay_request.relay_data).into(),
        }
    }
}
