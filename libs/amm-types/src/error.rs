use soroban_sdk::contracterror;

/// Errors surfaced by the factory, router and liquidity manager.
///
/// Every error aborts the whole invocation; no partial state survives.
#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum AmmError {
    /// The request deadline has already passed
    Expired = 1,
    /// A computed amount fell below the caller's minimum
    InsufficientOutput = 2,
    /// A deposit, swap input or split amount resolved to zero
    ZeroInput = 3,
    /// Split ratio outside [0, 10000]
    InvalidRatio = 4,
    /// Caller is not the operator of a privileged operation
    Unauthorized = 5,
    /// Pair state violated its invariants
    DegenerateState = 6,
    /// Two assets that must differ are the same
    IdenticalAssets = 7,
    /// A pair already exists for these tokens and curve
    PairExists = 8,
    /// No pair exists for these tokens and curve
    PairNotFound = 9,
    /// Reserves or minted shares too small for the requested operation
    InsufficientLiquidity = 10,
    /// Negative or otherwise unrepresentable amount
    InvalidAmount = 11,
    /// Fee above the configurable maximum
    InvalidFee = 12,
    /// Token is not part of the pair
    InvalidToken = 13,
}
