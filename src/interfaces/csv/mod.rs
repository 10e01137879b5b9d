pub mod bank_code_reader;
