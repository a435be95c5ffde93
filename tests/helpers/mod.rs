// ==========================================
// 测试报表构建器 - 用于集成测试
// ==========================================
// 职责: 生成 HTML / CSV / xlsx 交易报表夹具
// ==========================================

#![allow(dead_code)]

pub mod workbook_builder;

/// 13 列标准表头
pub const MT5_HEADER: [&str; 13] = [
    "Time",
    "Position",
    "Symbol",
    "Type",
    "Volume",
    "Price",
    "S / L",
    "T / P",
    "Time",
    "Price",
    "Commission",
    "Swap",
    "Profit",
];

// ==========================================
// 交易行构建器
// ==========================================

#[derive(Debug, Clone)]
pub struct TradeRowBuilder {
    entry_time: String,
    ticket: String,
    symbol: String,
    kind: String,
    volume: String,
    entry_price: String,
    exit_time: String,
    exit_price: String,
    commission: String,
    swap: String,
    profit: String,
    inserted: usize,
}

impl TradeRowBuilder {
    pub fn new(ticket: &str, kind: &str) -> Self {
        Self {
            entry_time: "2025.12.05 09:30:00".to_string(),
            ticket: ticket.to_string(),
            symbol: "EURUSD".to_string(),
            kind: kind.to_string(),
            volume: "0.10".to_string(),
            entry_price: "1.0500".to_string(),
            exit_time: "2025.12.05 10:00:00".to_string(),
            exit_price: "1.0550".to_string(),
            commission: "-0.70".to_string(),
            swap: "0.00".to_string(),
            profit: "50.00".to_string(),
            inserted: 0,
        }
    }

    pub fn symbol(mut self, symbol: &str) -> Self {
        self.symbol = symbol.to_string();
        self
    }

    pub fn volume(mut self, volume: &str) -> Self {
        self.volume = volume.to_string();
        self
    }

    pub fn prices(mut self, entry: &str, exit: &str) -> Self {
        self.entry_price = entry.to_string();
        self.exit_price = exit.to_string();
        self
    }

    pub fn times(mut self, entry: &str, exit: &str) -> Self {
        self.entry_time = entry.to_string();
        self.exit_time = exit.to_string();
        self
    }

    pub fn profit(mut self, profit: &str) -> Self {
        self.profit = profit.to_string();
        self
    }

    /// Type 之后插入的额外空列数（14/15 列布局）
    pub fn inserted_columns(mut self, count: usize) -> Self {
        self.inserted = count;
        self
    }

    pub fn cells(&self) -> Vec<String> {
        let mut cells = vec![
            self.entry_time.clone(),
            self.ticket.clone(),
            self.symbol.clone(),
            self.kind.clone(),
        ];
        cells.extend(std::iter::repeat(String::new()).take(self.inserted));
        cells.extend([
            self.volume.clone(),
            self.entry_price.clone(),
            String::new(),
            String::new(),
            self.exit_time.clone(),
            self.exit_price.clone(),
            self.commission.clone(),
            self.swap.clone(),
            self.profit.clone(),
        ]);
        cells
    }
}

/// 账户台账行（balance / deposit）
pub fn ledger_row(ticket: &str, kind: &str, amount: &str) -> Vec<String> {
    let mut cells = vec![
        "2025.12.01 08:00:00".to_string(),
        ticket.to_string(),
        String::new(),
        kind.to_string(),
    ];
    cells.extend(std::iter::repeat(String::new()).take(8));
    cells.push(amount.to_string());
    cells
}

// ==========================================
// HTML 报表
// ==========================================

fn html_cells(cells: &[String]) -> String {
    cells
        .iter()
        .map(|c| format!("<td>{}</td>", c))
        .collect::<Vec<_>>()
        .join("")
}

/// 券商 HTML 交易历史报表（Positions → Orders → 汇总）
pub fn markup_report(rows: &[Vec<String>], total: Option<&str>) -> String {
    let mut html = String::from(
        "<!DOCTYPE html>\n<html>\n<head><meta charset=\"utf-8\"><title>Trade History Report</title></head>\n<body>\n<table cellspacing=\"1\" cellpadding=\"3\" border=\"0\">\n",
    );
    html.push_str("<tr align=\"center\"><td colspan=\"13\"><div style=\"font: 14pt Tahoma\"><b>Trade History Report</b></div></td></tr>\n");
    html.push_str("<tr align=\"left\"><td colspan=\"3\">Name:</td><td colspan=\"10\"><b>Demo Account</b></td></tr>\n");
    html.push_str("<tr align=\"center\"><th colspan=\"13\" style=\"height: 25px\"><div><b>Positions</b></div></th></tr>\n");

    let header: Vec<String> = MT5_HEADER.iter().map(|h| h.to_string()).collect();
    html.push_str(&format!(
        "<tr bgcolor=\"#E5F0FC\" align=\"center\">{}</tr>\n",
        header
            .iter()
            .map(|h| format!("<td><b>{}</b></td>", h))
            .collect::<Vec<_>>()
            .join("")
    ));

    for row in rows {
        html.push_str(&format!(
            "<tr bgcolor=\"#FFFFFF\" align=\"right\">{}</tr>\n",
            html_cells(row)
        ));
    }

    html.push_str("<tr align=\"center\"><th colspan=\"13\" style=\"height: 25px\"><div><b>Orders</b></div></th></tr>\n");
    html.push_str("<tr bgcolor=\"#FFFFFF\" align=\"right\"><td>2025.12.05 09:30:00</td><td>9001</td><td>EURUSD</td><td>buy</td><td>0.10 / 0.10</td><td>1.0500</td><td></td><td></td><td>2025.12.05 09:30:00</td><td>filled</td><td></td></tr>\n");

    if let Some(total) = total {
        html.push_str(&format!(
            "<tr align=\"right\"><td colspan=\"3\">Total Net Profit:</td><td colspan=\"2\"><b>{}</b></td><td colspan=\"3\">Gross Profit:</td><td colspan=\"2\"><b>999.00</b></td></tr>\n",
            total
        ));
    }

    html.push_str("</table>\n</body>\n</html>\n");
    html
}

// ==========================================
// CSV 报表
// ==========================================

/// 逗号分隔的交易历史报表
pub fn csv_report(rows: &[Vec<String>], total: Option<&str>) -> String {
    let mut lines = vec![
        "Trade History Report".to_string(),
        "Name:,Demo Account".to_string(),
        "Positions".to_string(),
        MT5_HEADER.join(","),
    ];
    for row in rows {
        lines.push(row.join(","));
    }
    lines.push("Orders".to_string());
    lines.push("2025.12.05 09:30:00,9001,EURUSD,buy,0.10,1.0500,,,,filled".to_string());
    if let Some(total) = total {
        lines.push(format!("Total Net Profit:,{}", total));
    }
    let mut text = lines.join("\n");
    text.push('\n');
    text
}

// ==========================================
// 编码
// ==========================================

/// 带 BOM 的 UTF-16LE 字节
pub fn utf16le_with_bom(text: &str) -> Vec<u8> {
    let mut bytes = vec![0xFF, 0xFE];
    for unit in text.encode_utf16() {
        bytes.extend_from_slice(&unit.to_le_bytes());
    }
    bytes
}
