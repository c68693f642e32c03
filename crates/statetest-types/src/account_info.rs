use crate::serializer;
use primitives::hex;
use serde::{ser::SerializeStruct, Serialize, Serializer};
use state::{Account, ExpectedAccount, Storage};

/// Serialized view of a pre state account.
#[derive(Clone, Copy, Debug)]
pub struct AccountInfo<'a>(pub &'a Account);

impl Serialize for AccountInfo<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let account = self.0;
        let mut s = serializer.serialize_struct("AccountInfo", 4)?;
        s.serialize_field("balance", &format!("{:#x}", account.balance))?;
        s.serialize_field("code", &hex::encode_prefixed(&account.code))?;
        s.serialize_field("nonce", &format!("{:#x}", account.nonce))?;
        s.serialize_field("storage", &StorageInfo(&account.storage))?;
        s.end()
    }
}

/// Serialized view of a post state expectation. Unchecked fields are left out.
#[derive(Clone, Copy, Debug)]
pub struct ExpectedAccountInfo<'a>(pub &'a ExpectedAccount);

impl Serialize for ExpectedAccountInfo<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let account = self.0;
        let mut s = serializer.serialize_struct("ExpectedAccountInfo", 4)?;
        match &account.balance {
            Some(balance) => s.serialize_field("balance", &format!("{balance:#x}"))?,
            None => s.skip_field("balance")?,
        }
        match &account.code {
            Some(code) => s.serialize_field("code", &hex::encode_prefixed(code))?,
            None => s.skip_field("code")?,
        }
        match &account.nonce {
            Some(nonce) => s.serialize_field("nonce", &format!("{nonce:#x}"))?,
            None => s.skip_field("nonce")?,
        }
        match &account.storage {
            Some(storage) => s.serialize_field("storage", &StorageInfo(storage))?,
            None => s.skip_field("storage")?,
        }
        s.end()
    }
}

struct StorageInfo<'a>(&'a Storage);

impl Serialize for StorageInfo<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer::storage(self.0, serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use primitives::{bytes, U256};

    #[test]
    fn account() {
        let account = Account::from_balance(U256::from(10))
            .with_code(bytes!("00"))
            .with_storage([(1u64, 0u64), (2, 3)]);
        assert_eq!(
            serde_json::to_string(&AccountInfo(&account)).unwrap(),
            r#"{"balance":"0xa","code":"0x00","nonce":"0x0","storage":{"0x2":"0x3"}}"#
        );
    }

    #[test]
    fn expectation_skips_unchecked_fields() {
        let expected = ExpectedAccount::new().with_storage([(0u64, 0xffu64), (1, 0)]);
        assert_eq!(
            serde_json::to_string(&ExpectedAccountInfo(&expected)).unwrap(),
            r#"{"storage":{"0x0":"0xff"}}"#
        );
    }
}
