use sqlx::encode::IsNull;
use sqlx::error::BoxDynError;
use sqlx::sqlite::{SqliteArgumentValue, SqliteTypeInfo, SqliteValueRef};
use sqlx::{Decode, Encode, Sqlite, Type};

use common::prelude::AccountKey;

/// Database-compatible account key wrapper (SQLite stores as base64 TEXT)
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DAccountKey(AccountKey);

impl From<DAccountKey> for AccountKey {
    fn from(val: DAccountKey) -> Self {
        val.0
    }
}

impl From<AccountKey> for DAccountKey {
    fn from(key: AccountKey) -> Self {
        Self(key)
    }
}

impl std::ops::Deref for DAccountKey {
    type Target = AccountKey;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<'r> Decode<'r, Sqlite> for DAccountKey {
    fn decode(value: SqliteValueRef<'r>) -> Result<Self, BoxDynError> {
        let s = <String as Decode<Sqlite>>::decode(value)?;
        let key = AccountKey::from_base64(&s)?;
        Ok(Self(key))
    }
}

impl<'q> Encode<'q, Sqlite> for DAccountKey {
    fn encode_by_ref(
        &self,
        args: &mut Vec<SqliteArgumentValue<'q>>,
    ) -> Result<IsNull, BoxDynError> {
        args.push(SqliteArgumentValue::Text(self.0.to_base64().into()));
        Ok(IsNull::No)
    }
}

impl Type<Sqlite> for DAccountKey {
    fn compatible(ty: &SqliteTypeInfo) -> bool {
        <String as Type<Sqlite>>::compatible(ty)
    }

    fn type_info() -> SqliteTypeInfo {
        <String as Type<Sqlite>>::type_info()
    }
}
