//! 集中式所有权校验。
//!
//! 所有职位/申请的变更路径在写入前都必须通过这里的检查，
//! 不再把同样的比较散落在每个入口。

use crate::errors::DomainError;
use crate::value_objects::UserId;

/// 调用者与存储的所有者引用一致才放行。
pub fn ensure_owner(owner: UserId, caller: UserId) -> Result<(), DomainError> {
    if owner == caller {
        Ok(())
    } else {
        Err(DomainError::NotOwner)
    }
}
