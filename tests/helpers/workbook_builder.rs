// ==========================================
// 最小 xlsx 工作簿构建器
// ==========================================
// 仅包含读取首个工作表所需的部件: 内容类型、关系、工作簿、共享字符串、sheet1
// ==========================================

use std::io::{Cursor, Write};
use zip::write::FileOptions;
use zip::CompressionMethod;

/// 单元格: 文本走共享字符串,数值直接写入
#[derive(Debug, Clone)]
pub enum XlsxCell {
    Text(String),
    Number(f64),
    Empty,
}

impl From<&str> for XlsxCell {
    fn from(value: &str) -> Self {
        if value.is_empty() {
            XlsxCell::Empty
        } else {
            XlsxCell::Text(value.to_string())
        }
    }
}

impl From<f64> for XlsxCell {
    fn from(value: f64) -> Self {
        XlsxCell::Number(value)
    }
}

/// 列号（0 起）→ 列字母
fn column_letters(mut index: usize) -> String {
    let mut letters = Vec::new();
    loop {
        letters.push((b'A' + (index % 26) as u8) as char);
        if index < 26 {
            break;
        }
        index = index / 26 - 1;
    }
    letters.iter().rev().collect()
}

fn xml_escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
<Default Extension="xml" ContentType="application/xml"/>
<Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>
<Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>
<Override PartName="/xl/sharedStrings.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sharedStrings+xml"/>
</Types>"#;

const ROOT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/>
</Relationships>"#;

const WORKBOOK: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">
<sheets><sheet name="Report" sheetId="1" r:id="rId1"/></sheets>
</workbook>"#;

const WORKBOOK_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/>
<Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/sharedStrings" Target="sharedStrings.xml"/>
</Relationships>"#;

/// 按行构建 xlsx 字节
pub fn build_xlsx(rows: &[Vec<XlsxCell>]) -> Vec<u8> {
    let mut shared: Vec<String> = Vec::new();
    let mut sheet_rows = String::new();

    for (row_idx, row) in rows.iter().enumerate() {
        let row_number = row_idx + 1;
        let mut cells_xml = String::new();
        for (col_idx, cell) in row.iter().enumerate() {
            let reference = format!("{}{}", column_letters(col_idx), row_number);
            match cell {
                XlsxCell::Empty => {}
                XlsxCell::Number(value) => {
                    cells_xml.push_str(&format!("<c r=\"{}\"><v>{}</v></c>", reference, value));
                }
                XlsxCell::Text(text) => {
                    let index = match shared.iter().position(|s| s == text) {
                        Some(index) => index,
                        None => {
                            shared.push(text.clone());
                            shared.len() - 1
                        }
                    };
                    cells_xml.push_str(&format!(
                        "<c r=\"{}\" t=\"s\"><v>{}</v></c>",
                        reference, index
                    ));
                }
            }
        }
        sheet_rows.push_str(&format!("<row r=\"{}\">{}</row>", row_number, cells_xml));
    }

    let sheet = format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n<worksheet xmlns=\"http://schemas.openxmlformats.org/spreadsheetml/2006/main\"><sheetData>{}</sheetData></worksheet>",
        sheet_rows
    );
    let shared_strings = format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n<sst xmlns=\"http://schemas.openxmlformats.org/spreadsheetml/2006/main\" count=\"{0}\" uniqueCount=\"{0}\">{1}</sst>",
        shared.len(),
        shared
            .iter()
            .map(|s| format!("<si><t>{}</t></si>", xml_escape(s)))
            .collect::<Vec<_>>()
            .join("")
    );

    build_parts(shared_strings.as_bytes(), sheet.as_bytes())
}

/// 首个共享字符串的 <t> 内容按原样写入（可含非法字节或未知实体）
pub fn build_xlsx_with_raw_shared_string(raw: &[u8]) -> Vec<u8> {
    let mut shared_strings = b"<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n<sst xmlns=\"http://schemas.openxmlformats.org/spreadsheetml/2006/main\" count=\"1\" uniqueCount=\"1\"><si><t>".to_vec();
    shared_strings.extend_from_slice(raw);
    shared_strings.extend_from_slice(b"</t></si></sst>");
    let sheet = "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n<worksheet xmlns=\"http://schemas.openxmlformats.org/spreadsheetml/2006/main\"><sheetData><row r=\"1\"><c r=\"A1\" t=\"s\"><v>0</v></c></row></sheetData></worksheet>";
    build_parts(&shared_strings, sheet.as_bytes())
}

fn build_parts(shared_strings: &[u8], sheet: &[u8]) -> Vec<u8> {
    build_zip(&[
        ("[Content_Types].xml", CONTENT_TYPES.as_bytes()),
        ("_rels/.rels", ROOT_RELS.as_bytes()),
        ("xl/workbook.xml", WORKBOOK.as_bytes()),
        ("xl/_rels/workbook.xml.rels", WORKBOOK_RELS.as_bytes()),
        ("xl/sharedStrings.xml", shared_strings),
        ("xl/worksheets/sheet1.xml", sheet),
    ])
}

/// 任意条目的 zip 压缩包（Stored）
pub fn build_zip(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut buf = Vec::new();
    {
        let mut zip = zip::ZipWriter::new(Cursor::new(&mut buf));
        for (name, content) in entries {
            let options: FileOptions<'_, ()> =
                FileOptions::default().compression_method(CompressionMethod::Stored);
            zip.start_file(*name, options).expect("start zip entry");
            zip.write_all(content).expect("write zip entry");
        }
        zip.finish().expect("finish zip");
    }
    buf
}

/// 文本行 → xlsx 行（空字符串为空单元格）
pub fn text_row(cells: &[String]) -> Vec<XlsxCell> {
    cells.iter().map(|c| XlsxCell::from(c.as_str())).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_letters() {
        assert_eq!(column_letters(0), "A");
        assert_eq!(column_letters(12), "M");
        assert_eq!(column_letters(25), "Z");
        assert_eq!(column_letters(26), "AA");
    }
}
