use sqlx::encode::IsNull;
use sqlx::error::BoxDynError;
use sqlx::sqlite::{SqliteArgumentValue, SqliteTypeInfo, SqliteValueRef};
use sqlx::{Decode, Encode, Sqlite, Type};

use common::prelude::PasswordHash;

/// Database-compatible password hash wrapper (SQLite stores the
///  self-describing argon2id text form)
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DPasswordHash(PasswordHash);

impl From<DPasswordHash> for PasswordHash {
    fn from(val: DPasswordHash) -> Self {
        val.0
    }
}

impl From<PasswordHash> for DPasswordHash {
    fn from(hash: PasswordHash) -> Self {
        Self(hash)
    }
}

impl std::ops::Deref for DPasswordHash {
    type Target = PasswordHash;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<'r> Decode<'r, Sqlite> for DPasswordHash {
    fn decode(value: SqliteValueRef<'r>) -> Result<Self, BoxDynError> {
        let s = <String as Decode<Sqlite>>::decode(value)?;
        let hash = s.parse::<PasswordHash>()?;
        Ok(Self(hash))
    }
}

impl<'q> Encode<'q, Sqlite> for DPasswordHash {
    fn encode_by_ref(
        &self,
        args: &mut Vec<SqliteArgumentValue<'q>>,
    ) -> Result<IsNull, BoxDynError> {
        args.push(SqliteArgumentValue::Text(self.0.to_string().into()));
        Ok(IsNull::No)
    }
}

impl Type<Sqlite> for DPasswordHash {
    fn compatible(ty: &SqliteTypeInfo) -> bool {
        <String as Type<Sqlite>>::compatible(ty)
    }

    fn type_info() -> SqliteTypeInfo {
        <String as Type<Sqlite>>::type_info()
    }
}
