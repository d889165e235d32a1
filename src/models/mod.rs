pub mod transaction;
pub mod address;
pub mod seen;

pub use transaction::{
    Asset, Contract, ContractValue, RawAmount, TransactionPage, TransferDirection, TransferEvent,
    Trc20TransferInfo, TronTransaction, TRANSFER_CONTRACT_TYPE, UNITS_PER_COIN, scale_amount,
    transaction_id,
};
pub use address::{AddressError, TronAddress, normalize_address};
pub use seen::SeenTransactions;
