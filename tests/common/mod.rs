#![allow(dead_code)]

use rust_xlsxwriter::{Format, Workbook as XlsxWorkbook};

/// Two sheets of a statement: "Jan" (header + 4 rows, mixed types) and "Feb".
pub fn statement_xlsx() -> Vec<u8> {
    let mut book = XlsxWorkbook::new();
    let date = Format::new().set_num_format("yyyy-mm-dd");

    let jan = book.add_worksheet();
    jan.set_name("Jan").unwrap();
    jan.write_string(0, 0, "Date").unwrap();
    jan.write_string(0, 1, "Label").unwrap();
    jan.write_string(0, 2, "Amount").unwrap();
    jan.write_string(0, 3, "Cleared").unwrap();
    for (i, (label, amount)) in [("Rent", -950.0), ("Salary", 2400.5), ("Fee", -3.2), ("Refund", 12.0)]
        .iter()
        .enumerate()
    {
        let row = i as u32 + 1;
        jan.write_number_with_format(row, 0, 45292.0 + i as f64, &date).unwrap();
        jan.write_string(row, 1, *label).unwrap();
        jan.write_number(row, 2, *amount).unwrap();
        jan.write_boolean(row, 3, i % 2 == 0).unwrap();
    }

    let feb = book.add_worksheet();
    feb.set_name("Feb").unwrap();
    feb.write_string(0, 0, "Date").unwrap();
    feb.write_string(0, 1, "Amount").unwrap();
    feb.write_number_with_format(1, 0, 45323.0, &date).unwrap();
    feb.write_number(1, 1, 99.99).unwrap();

    book.save_to_buffer().unwrap()
}

/// A single 3x3 sheet named "Data" holding "r{row}c{col}".
pub fn three_by_three_xlsx() -> Vec<u8> {
    let mut book = XlsxWorkbook::new();
    let sheet = book.add_worksheet();
    sheet.set_name("Data").unwrap();
    for r in 0..3u32 {
        for c in 0..3u16 {
            sheet.write_string(r, c, format!("r{}c{}", r, c).as_str()).unwrap();
        }
    }
    book.save_to_buffer().unwrap()
}
