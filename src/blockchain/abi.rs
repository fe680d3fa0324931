//! Contract call descriptors.
//!
//! Generated at compile time by `sol!`, so there is no runtime ABI parsing
//! step that could fail at startup.

use alloy::sol;

sol! {
    /// Fungible token calls used for fee payment.
    interface IERC20 {
        function balanceOf(address account) external view returns (uint256);
        function transfer(address to, uint256 value) external returns (bool);
    }

    /// Mintable multi-token target.
    interface IMintable {
        function mint(address to, uint256 tokenId, uint256 amount, bytes data) external;
    }

    /// CREATE2 factory for wallet proxies.
    interface IWalletFactory {
        function deploy(address _mainModule, bytes32 _salt) external payable returns (address _contract);
    }

    /// A single call inside a wallet batch.
    #[derive(Debug, PartialEq, Eq)]
    struct MetaTransaction {
        bool delegateCall;
        bool revertOnError;
        uint256 gasLimit;
        address target;
        uint256 value;
        bytes data;
    }

    /// Batch execution entry points of the wallet implementation.
    interface IModuleCalls {
        function readNonce(uint256 _space) external view returns (uint256);
        function execute(MetaTransaction[] _txs, uint256 _nonce, bytes _signature) external;
    }
}
