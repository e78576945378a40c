mod escaping;
mod generated_sql;
