//! Solidity bindings for the CLOB and token contracts.

use alloy_sol_types::sol;

sol! {
    /// The order-book contract. Matching and settlement happen on chain.
    interface IClob {
        struct Order {
            uint256 orderId;
            address owner;
            uint256 price;
            uint256 amount;
            bool isBid;
        }

        function getOrderBook() external view returns (Order[] memory bids, Order[] memory asks);

        function placeOrder(uint256 price, uint256 amount, bool isBid) external;

        event OrderMatched(uint256 orderId1, uint256 orderId2, uint256 price, uint256 amount);
    }

    /// ERC-20 with an open test-token `mint`.
    interface IMintableToken {
        function balanceOf(address owner) external view returns (uint256);

        function allowance(address owner, address spender) external view returns (uint256);

        function approve(address spender, uint256 amount) external returns (bool);

        function mint(address to, uint256 amount) external;
    }
}
