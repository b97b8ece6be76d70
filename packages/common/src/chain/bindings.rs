use ethers::contract::abigen;

abigen!(
    Erc20Token,
    r#"[
        function approve(address spender, uint256 amount) external returns (bool)
    ]"#
);

abigen!(
    ContentAccess,
    r#"[
        function purchaseAccess() external
        function hasAccess(address user) external view returns (bool)
    ]"#
);
