use crate::result_parser::CanonicalResult;
use tipster_data::models::PositionOutcome;

/// One betting-market settlement rule.
///
/// Implementations are pure and never fail: any selection string combined
/// with any (possibly absent) result yields exactly one outcome.
pub trait MarketStrategy: Send + Sync {
    /// Decides the outcome of a selection against a canonical result.
    ///
    /// `None` means the event produced no usable data; every strategy
    /// settles that as Void.
    fn determine(&self, selection: &str, result: Option<&CanonicalResult>) -> PositionOutcome;

    /// Market name for logging.
    fn name(&self) -> &'static str;
}
