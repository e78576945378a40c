mod atomicity;
mod concurrency;
mod ordering;
mod store;
