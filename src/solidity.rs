//! Definitions of the contract functions called by the deploy and
//! interaction scripts

use alloy_sol_types::sol;
use ethers::contract::abigen;

sol! {
    function initialize(address admin) external;
}

abigen!(
    OrderNftContract,
    r#"[
        function MINTER_ROLE() external view returns (bytes32)
        function hasRole(bytes32 role, address account) external view returns (bool)
        function grantRole(bytes32 role, address account) external
        function totalSupply() external view returns (uint256)
        function mintOrder(address to, uint256 productId, uint256 amount, uint256 price, uint256 totalPrice) external returns (uint256)
    ]"#,
);

abigen!(
    RewardVaultContract,
    r#"[
        function ADMIN_ROLE() external view returns (bytes32)
        function TREASURY_ROLE() external view returns (bytes32)
        function CLAIMER_ROLE() external view returns (bytes32)
        function hasRole(bytes32 role, address account) external view returns (bool)
        function grantRole(bytes32 role, address account) external
        function depositTokens(address token, uint256 amount) external
        function getTokenBalance(address token) external view returns (uint256)
        function upgradeToAndCall(address newImplementation, bytes memory data) external payable
    ]"#,
);

abigen!(
    ClaimRewardContract,
    r#"[
        function SIGNER_ROLE() external view returns (bytes32)
        function hasRole(bytes32 role, address account) external view returns (bool)
        function grantRole(bytes32 role, address account) external
        function vault() external view returns (address)
        function minPointsToClaim() external view returns (uint256)
        function calculateTotalPoints(address user) external view returns (uint256)
        function getAvailablePoints(address user) external view returns (uint256)
        function getUserNonce(address user) external view returns (uint256)
    ]"#,
);

abigen!(
    RewardManagerContract,
    r#"[
        function POINTS_MANAGER_ROLE() external view returns (bytes32)
        function hasRole(bytes32 role, address account) external view returns (bool)
        function grantRole(bytes32 role, address account) external
        function userPoints(address user) external view returns (uint256)
    ]"#,
);

abigen!(
    VaultContract,
    r#"[
        function transferFunds(address token, uint256 amount) external
    ]"#,
);

abigen!(
    Erc20Contract,
    r#"[
        function totalSupply() external view returns (uint256)
        function balanceOf(address account) external view returns (uint256)
        function transfer(address to, uint256 value) external returns (bool)
        function allowance(address owner, address spender) external view returns (uint256)
        function approve(address spender, uint256 value) external returns (bool)
    ]"#,
);
