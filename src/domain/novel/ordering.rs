//! Novel Context - 章节重排
//!
//! 拖拽排序后，客户端提交完整的章节顺序；这里负责把它规范化为
//! `(chapter_id, order_index)` 批次，并校验它是当前章节集合的一个排列。

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::NovelError;

/// 单个章节的目标位置
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChapterOrder {
    pub chapter_id: i64,
    pub order_index: i64,
}

impl ChapterOrder {
    pub fn new(chapter_id: i64, order_index: i64) -> Self {
        Self {
            chapter_id,
            order_index,
        }
    }
}

/// 重排计划
///
/// 不变量:
/// - 每个章节 ID 只出现一次
/// - order_index 恰好构成 [0, N) 的一个排列
/// - orders 按 order_index 升序保存
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReorderPlan {
    orders: Vec<ChapterOrder>,
}

impl ReorderPlan {
    /// 按列表位置（从 0 开始）生成计划
    pub fn from_ordered_ids(ids: &[i64]) -> Result<Self, NovelError> {
        let orders = ids
            .iter()
            .enumerate()
            .map(|(index, id)| ChapterOrder::new(*id, index as i64))
            .collect();
        Self::from_orders(orders)
    }

    /// 从客户端提交的 `(id, orderIndex)` 对生成计划
    pub fn from_orders(mut orders: Vec<ChapterOrder>) -> Result<Self, NovelError> {
        let mut seen_ids = HashSet::with_capacity(orders.len());
        for order in &orders {
            if !seen_ids.insert(order.chapter_id) {
                return Err(NovelError::InvalidOrder(format!(
                    "chapter {} appears more than once",
                    order.chapter_id
                )));
            }
        }

        orders.sort_by_key(|o| o.order_index);
        for (position, order) in orders.iter().enumerate() {
            if order.order_index != position as i64 {
                return Err(NovelError::InvalidOrder(format!(
                    "order indices must form a contiguous sequence starting at 0 (expected {}, got {})",
                    position, order.order_index
                )));
            }
        }

        Ok(Self { orders })
    }

    /// 校验计划覆盖了小说当前的全部章节，且不包含其他章节
    pub fn validate_against(&self, current_ids: &[i64]) -> Result<(), NovelError> {
        let current: HashSet<i64> = current_ids.iter().copied().collect();
        let submitted: HashSet<i64> = self.orders.iter().map(|o| o.chapter_id).collect();

        if let Some(unknown) = submitted.difference(&current).min() {
            return Err(NovelError::InvalidOrder(format!(
                "chapter {} does not belong to this novel",
                unknown
            )));
        }
        if let Some(missing) = current.difference(&submitted).min() {
            return Err(NovelError::InvalidOrder(format!(
                "chapter {} is missing from the new order",
                missing
            )));
        }
        Ok(())
    }

    pub fn orders(&self) -> &[ChapterOrder] {
        &self.orders
    }

    pub fn ordered_ids(&self) -> Vec<i64> {
        self.orders.iter().map(|o| o.chapter_id).collect()
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }
}
