// ==========================================
// 交易报表导入引擎 - 列名消歧器
// ==========================================
// 职责: 表头文本（可能重复）→ 规范列名
// 规则:
//   - 别名表把本地化/变体表头归一为基础标签（Время → Time, Position → Ticket）
//   - 重复标签 Time/Price 出现在 13 列布局的预期位置 → 语义名
//     （Entry Time@0, Entry Price@5, Exit Time@8, Exit Price@9）
//   - 同名标签出现在非预期位置 → 数字后缀（Time_2, Time_3 …）,不做语义猜测
//   - 列数布局表（13/14/15 列）以数据形式维护,新增布局只需追加一行
// ==========================================

use crate::domain::trade::{CellValue, HeaderMap};
use crate::importer::trade_importer_trait::ColumnDisambiguator;
use std::collections::{HashMap, HashSet};
use tracing::debug;

// ==========================================
// 规范列名
// ==========================================
pub mod fields {
    pub const ENTRY_TIME: &str = "Entry Time";
    pub const TICKET: &str = "Ticket";
    pub const SYMBOL: &str = "Symbol";
    pub const TYPE: &str = "Type";
    pub const VOLUME: &str = "Volume";
    pub const ENTRY_PRICE: &str = "Entry Price";
    pub const STOP_LOSS: &str = "S/L";
    pub const TAKE_PROFIT: &str = "T/P";
    pub const EXIT_TIME: &str = "Exit Time";
    pub const EXIT_PRICE: &str = "Exit Price";
    pub const COMMISSION: &str = "Commission";
    pub const SWAP: &str = "Swap";
    pub const PROFIT: &str = "Profit";
}

/// 规范列顺序（布局表的位置数组与之一一对应）
pub const CANONICAL_FIELDS: [&str; 13] = [
    fields::ENTRY_TIME,
    fields::TICKET,
    fields::SYMBOL,
    fields::TYPE,
    fields::VOLUME,
    fields::ENTRY_PRICE,
    fields::STOP_LOSS,
    fields::TAKE_PROFIT,
    fields::EXIT_TIME,
    fields::EXIT_PRICE,
    fields::COMMISSION,
    fields::SWAP,
    fields::PROFIT,
];

// ==========================================
// ColumnLayout - 列数 → 字段位置
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnLayout {
    pub column_count: usize,
    positions: [usize; 13],
}

/// 已知布局: Type 之后插入 1~2 列时,后续字段整体右移
pub const COLUMN_LAYOUTS: [ColumnLayout; 3] = [
    ColumnLayout {
        column_count: 13,
        positions: [0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12],
    },
    ColumnLayout {
        column_count: 14,
        positions: [0, 1, 2, 3, 5, 6, 7, 8, 9, 10, 11, 12, 13],
    },
    ColumnLayout {
        column_count: 15,
        positions: [0, 1, 2, 3, 6, 7, 8, 9, 10, 11, 12, 13, 14],
    },
];

impl ColumnLayout {
    /// 按列数查找布局
    pub fn for_width(column_count: usize) -> Option<&'static ColumnLayout> {
        COLUMN_LAYOUTS
            .iter()
            .find(|layout| layout.column_count == column_count)
    }

    /// 基准 13 列布局
    pub fn canonical() -> &'static ColumnLayout {
        &COLUMN_LAYOUTS[0]
    }

    pub fn position_of(&self, field: &str) -> Option<usize> {
        CANONICAL_FIELDS
            .iter()
            .position(|f| *f == field)
            .map(|idx| self.positions[idx])
    }

    /// 完整表头: 插入列命名为 Column_N（N 从 1 开始）
    pub fn header(&self) -> HeaderMap {
        let mut names: Vec<String> = (0..self.column_count).map(column_fallback_name).collect();
        for (field, position) in CANONICAL_FIELDS.iter().zip(self.positions.iter()) {
            names[*position] = field.to_string();
        }
        HeaderMap::new(names)
    }
}

fn column_fallback_name(position: usize) -> String {
    format!("Column_{}", position + 1)
}

// ==========================================
// 表头别名
// ==========================================
const HEADER_ALIASES: [(&str, &str); 26] = [
    ("time", "Time"),
    ("время", "Time"),
    ("price", "Price"),
    ("цена", "Price"),
    ("position", fields::TICKET),
    ("позиция", fields::TICKET),
    ("ticket", fields::TICKET),
    ("тикет", fields::TICKET),
    ("symbol", fields::SYMBOL),
    ("символ", fields::SYMBOL),
    ("type", fields::TYPE),
    ("тип", fields::TYPE),
    ("volume", fields::VOLUME),
    ("объем", fields::VOLUME),
    ("объём", fields::VOLUME),
    ("s / l", fields::STOP_LOSS),
    ("s/l", fields::STOP_LOSS),
    ("t / p", fields::TAKE_PROFIT),
    ("t/p", fields::TAKE_PROFIT),
    ("commission", fields::COMMISSION),
    ("комиссия", fields::COMMISSION),
    ("swap", fields::SWAP),
    ("своп", fields::SWAP),
    ("profit", fields::PROFIT),
    ("прибыль", fields::PROFIT),
    ("lots", fields::VOLUME),
];

/// 会重复出现的基础标签 → 可承担的语义字段（预期位置取自布局表）
const POSITIONAL_ROLES: [(&str, [&str; 2]); 2] = [
    ("Time", [fields::ENTRY_TIME, fields::EXIT_TIME]),
    ("Price", [fields::ENTRY_PRICE, fields::EXIT_PRICE]),
];

/// 表头文本归一: 去尾部冒号、压缩空白、查别名
fn base_label(text: &str) -> String {
    let collapsed = text
        .trim()
        .trim_end_matches(':')
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let lower = collapsed.to_lowercase();
    HEADER_ALIASES
        .iter()
        .find(|(alias, _)| *alias == lower)
        .map(|(_, canonical)| canonical.to_string())
        .unwrap_or(collapsed)
}

// ==========================================
// PositionalDisambiguator 实现
// ==========================================
#[derive(Debug, Default, Clone, Copy)]
pub struct PositionalDisambiguator;

impl PositionalDisambiguator {
    pub fn new() -> Self {
        Self
    }

    fn has_positional_roles(label: &str) -> bool {
        POSITIONAL_ROLES.iter().any(|(base, _)| *base == label)
    }

    /// 标签在预期位置时返回语义名
    fn role_at(label: &str, position: usize, layout: &ColumnLayout) -> Option<&'static str> {
        POSITIONAL_ROLES
            .iter()
            .find(|(base, _)| *base == label)
            .and_then(|(_, roles)| {
                roles
                    .iter()
                    .find(|field| layout.position_of(field) == Some(position))
                    .copied()
            })
    }
}

impl ColumnDisambiguator for PositionalDisambiguator {
    fn disambiguate(&self, header: &[CellValue]) -> HeaderMap {
        let layout = ColumnLayout::canonical();
        let labels: Vec<String> = header.iter().map(|c| base_label(&c.as_text())).collect();

        let mut occurrences: HashMap<&str, usize> = HashMap::new();
        for label in &labels {
            *occurrences.entry(label.as_str()).or_insert(0) += 1;
        }

        // 第一遍: 预期位置 → 语义名；重复标签在非预期位置 → 数字后缀
        let mut suffix_counters: HashMap<&str, usize> = HashMap::new();
        let mut names: Vec<String> = Vec::with_capacity(labels.len());
        for (position, label) in labels.iter().enumerate() {
            let name = if label.is_empty() {
                column_fallback_name(position)
            } else if let Some(role) = Self::role_at(label, position, layout) {
                role.to_string()
            } else if Self::has_positional_roles(label)
                && occurrences.get(label.as_str()).copied().unwrap_or(0) > 1
            {
                let counter = suffix_counters.entry(label.as_str()).or_insert(1);
                *counter += 1;
                format!("{}_{}", label, counter)
            } else {
                label.clone()
            };
            names.push(name);
        }

        // 第二遍: 保证名称唯一
        let mut used: HashSet<String> = HashSet::new();
        for name in names.iter_mut() {
            if used.contains(name.as_str()) {
                let mut k = 2;
                while used.contains(&format!("{}_{}", name, k)) {
                    k += 1;
                }
                *name = format!("{}_{}", name, k);
            }
            used.insert(name.clone());
        }

        debug!(columns = names.len(), header = ?names, "表头消歧完成");
        HeaderMap::new(names)
    }

    fn header_for_width(&self, column_count: usize) -> Option<HeaderMap> {
        ColumnLayout::for_width(column_count).map(ColumnLayout::header)
    }
}
