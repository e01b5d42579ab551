//! One module per did:btc operation. Each adds methods to [`crate::DidTxBuilder`].

mod create;
mod deactivate;
mod update;

#[cfg(test)]
mod tests;
