pub mod sam_records;
