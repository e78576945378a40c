//! Shentong (Oscar) identifier rules.
//!
//! Oscar folds unquoted identifiers to upper case: `create table TABLE` and
//! `create table "TABLE"` refer to the same table, while `"table"` is a
//! different one. Names with any lower-case letter therefore need quoting
//! unless metadata says otherwise.

use crate::sql::handler::identifier_policy::{CaseFolding, EscapeSymbol, IdentifierPolicy, KeywordSet};
use std::sync::LazyLock;

static OSCAR_KEYWORDS: &[&str] = &[
    "ABORT", "ABSOLUTE", "ACCESS", "ACCESSED", "ACTION", "ADD", "ADMIN", "ADVISOR", "AFTER",
    "AGGREGATE", "ALTER", "ALWAYS", "ANALYSE", "ANALYZE", "ANALYZER", "APP", "ARCHIVE",
    "ARCHIVELOG", "ARE", "ARRAY", "ASC", "ASSERTION", "ASSIGNMENT", "AST", "ASYNC",
    "ATTRIBUTES", "AUDIT", "AUDITFILE", "AUTHID", "AUTHORIZATION", "AUTO", "AUTO_INCREMENT",
    "AUTOEXTEND", "BACKUP", "BACKWARD", "BASICANALYZER", "BATCHSIZE", "BEFORE", "BEGIN",
    "BETWEEN", "BIGINT", "BINARY", "BINLOG", "BIT", "BITMAP", "BLOCK", "BODY", "BOOLEAN",
    "BOTH", "BPCHAR", "BUFFER", "BUFFER_CACHE", "BUFFER_POOL", "BUILD", "BULK", "BY", "BYTE",
    "CACHE", "CALL", "CALLED", "CANCEL", "CASCADED", "CDC", "CHAIN", "CHANGE",
    "CHARACTERISTICS", "CHARACTERSET", "CHEAT", "CHECKPOINT", "CHINESEANALYZER", "CHUNK",
    "CJKANALYZER", "CLASS", "CLEAN", "CLOSE", "CLUSTER", "COLUMNS", "COMMENT", "COMMENTS",
    "COMMIT", "COMMITTED", "COMPILE", "COMPLETE", "COMPRESS", "CONCAT", "CONFIGURATION",
    "CONNECT", "CONNECT_BY_ISCYCLE", "CONNECT_BY_ISLEAF", "CONNECT_BY_ROOT", "CONSTRAINTS",
    "CONTENT", "CONTEXT", "CONTINUE", "CONTROLFILE", "CONVERSION", "COPY", "CROSS", "CSV",
    "CUBE", "CURRENT", "CURRENT_USER", "CURSOR", "CYCLE", "DATA", "DATABASE", "DATABASELINK",
    "DATAFILE", "DATAFILETYPE", "DATE", "DATE_ADD", "DATE_SUB", "DATEFORMAT", "DATETIME",
    "DAY", "DBA", "DEALLOCATE", "DEBUG", "DEC", "DECLARE", "DECODE", "DECRYPT", "DEFERRABLE",
    "DEFERRED", "DEFINER", "DELETE", "DELIMITED", "DELIMITER", "DELIMITERS", "DEMAND",
    "DENSE_RANK", "DESC", "DESCRIPTION", "DETERMINISTIC", "DIRECTORY", "DISABLE", "DOCUMENT",
    "DOMAIN", "DOUBLE", "DUMP", "EACH", "ELOG", "ELT", "EMPTY", "ENABLE", "ENCODING",
    "ENCRYPT", "ENCRYPTED", "ENCRYPTION", "END", "ERROR", "ERRORS", "ESCALATION", "ESCAPE",
    "EVENTS", "EXCHANGE", "EXCLUDING", "EXCLUSIVE", "EXEC", "EXECUTE", "EXPLAIN", "EXPORT",
    "EXTEND", "EXTERNALLY", "FAILOVER", "FALSE", "FAR", "FAST", "FAULT", "FETCH", "FIELD",
    "FIELDS", "FIELDTERMINATOR", "FILE", "FILESIZE", "FILL", "FILTER", "FIRE_TRIGGERS",
    "FIRST", "FIRSTROW", "FLUSH", "FOLLOWING", "FORCE", "FOREIGNKEY_CONSTRAINTS", "FOREVER",
    "FORMATFILE", "FORWARD", "FREELISTS", "FREEPOOLS", "FULL", "FULLTEXT", "FUNCTION", "G",
    "GB", "GBK", "GCOV", "GENERATED", "GEOGRAPHY", "GEOMETRY", "GET", "GETCLOBVAL",
    "GETSTRINGVAL", "GLOBAL", "GLOBAL_NAME", "GLOBALLY", "GREATEST", "GROUPING", "GROUPING_ID",
    "GUARANTEE", "HANDLER", "HASH", "HEADER", "HEAP", "HOLD", "HOUR", "IDENTIFIED", "IDENTITY",
    "IF", "IGNORE", "ILIKE", "IMMEDIATE", "IMMUTABLE", "IMPLICIT", "IMPORT", "IMPORT_POLCOL",
    "INCREMENT", "INDEX", "INDEXES", "INHERITS", "INIT", "INITIAL", "INITIALIZED", "INITIALLY",
    "INITRANS", "INNER", "INOUT", "INPUT", "INSENSITIVE", "INSERT", "INSTEAD", "INTERVAL",
    "INVALIDATE", "INVISIBLE", "INVOKER", "IP", "IS", "ISNULL", "ISOLATION", "JOIN", "JSON",
    "JSON_TABLE", "JSON_VALUE", "K", "KB", "KEEP", "KEEPIDENTITY", "KEEPNULLS", "KEY",
    "KEYSTORE", "KILL", "KILOBYTES_PER_BATCH", "KSTORE", "LABEL", "LANCOMPILER", "LANGUAGE",
    "LAST", "LASTROW", "LC_COLLATE", "LC_CTYPE", "LDRTRIM", "LEADING", "LEAK", "LEAST", "LEFT",
    "LESS", "LIFETIME", "LIKE", "LIMIT", "LIST", "LISTEN", "LOAD", "LOB", "LOCAL", "LOCATION",
    "LOCK", "LOCKED", "LOG", "LOGFILE", "LOGGING", "LOGICAL", "LONG", "LOOP", "LRTRIM", "LSN",
    "LTRIM", "M", "MAINTAIN_INDEX", "MAINTENANCE", "MANUAL", "MASKING", "MATCH", "MATCHED",
    "MATERIALIZED", "MAX", "MAXERRORS", "MAXEXTENDS", "MAXEXTENTS", "MAXSIZE", "MAXTRANS",
    "MAXVALUE", "MB", "MEMBER", "MEMORY", "MERGE", "MIN", "MINEXTENDS", "MINEXTENTS",
    "MINSIZE", "MINUS", "MINUTE", "MINVALUE", "MISSING", "MOD", "MODE", "MODIFY", "MONEY",
    "MONTH", "MOUNT", "MOVE", "MOVEMENT", "MULTICOLUMN", "MULTIPLE", "NAME", "NAMES",
    "NATURAL", "NCHAR", "NEVER", "NEWLINE", "NEXT", "NEXTVAL", "NO", "NOARCHIVELOG", "NOAUDIT",
    "NOCACHE", "NOCOMPRESS", "NOCOPY", "NOCYCLE", "NODE", "NOGUARANTEE", "NOLOGGING",
    "NOMAXVALUE", "NOMINVALUE", "NOMOUNT", "NORMAL", "NOTHING", "NOTIFY", "NOTNULL", "NOTRIM",
    "NOVALIDATE", "NOWAIT", "NVARCHAR2", "NVL", "NVL2", "OBJECT", "OF", "OFF", "OFFLINE",
    "OFFSET", "OIDS", "ONLINE", "OPEN", "OPERATOR", "OPTIMIZE", "OPTIMIZE_KSCACHE", "OPTION",
    "ORACLE", "ORDINALITY", "ORGANIZATION", "OSCAR", "OUT", "OUTER", "OUTLINE", "OVER",
    "OVERFLOW", "OVERLAPS", "OVERLAY", "OWNER", "PACKAGE", "PAGESIZE", "PARALLEL", "PARAMETER",
    "PARAMINFO", "PARTIAL", "PARTITION", "PARTITIONS", "PASSING", "PASSWORD", "PATH",
    "PCTFREE", "PCTINCREASE", "PCTTHRESHOLD", "PCTUSED", "PCTVERSION", "PENDANT", "PETENTION",
    "PFILE", "PIPELINED", "PIVOT", "PLACING", "PLS_INTEGER", "POLICY", "PORT", "POSITION",
    "PRECEDING", "PRECISION", "PREPARE", "PRESERVE", "PREVAL", "PRIMARY", "PRIOR", "PRIORITY",
    "PRIVILEGES", "PROCEDURAL", "PROCEDURE", "PUBLIC", "PURGE", "QU", "QUERY", "QUICK",
    "QUOTE", "RAC", "RANGE", "RATIO_TO_REPORT", "RAW", "READ", "READABLE", "READS", "READSIZE",
    "REBUILD", "RECHECK", "RECORDS", "RECOVERY", "RECREATE", "RECURSIVE", "RECYCLE", "REFRESH",
    "REGEXP", "REGION", "REJECT", "RELATIVE", "REMOVE", "RENAME", "REPEATABLE", "REPLACE",
    "RESET", "RESIZE", "RESOURCE", "RESTART", "RESTORE", "RESTRICT", "RESULT", "RESUME",
    "RETENTION", "RETURN", "RETURN_GENERATED_KEYS", "RETURNING", "RETURNS", "REUSE", "REVERSE",
    "REVOKE", "REWRITE", "RIGHT", "ROLE", "ROLLBACK", "ROLLUP", "ROW", "ROWDESCRIPTION",
    "ROWID", "ROWS", "ROWS_PER_BATCH", "ROWTERMINATOR", "ROWTYPE", "RTRIM", "RULE", "SAMPLE",
    "SAVEPOINT", "SCAN", "SCHEMA", "SCN", "SCROLL", "SECOND", "SECURITY", "SEGMENT",
    "SEPARATOR", "SEQUENCE", "SERIALIZABLE", "SESSION", "SETS", "SHARE", "SHOW", "SHRINK",
    "SHRINKLOG", "SHUTDOWN", "SIBLINGS", "SIGNED", "SILENTLY", "SIMILAR", "SIMPLE", "SINGLE",
    "SINGLEROW", "SIZE", "SKIP", "SMALLINT", "SPACE", "SPLIT", "STABLE", "STANDALONE",
    "STANDARDANALYZER", "START", "STARTFILE", "STARTPOS", "STARTTIME", "STARTUP", "STATEMENT",
    "STATIC", "STATISTICS", "STDIN", "STDOUT", "STOP", "STOPFILE", "STOPPOS", "STOPTIME",
    "STOPWORDS", "STORAGE", "STORE", "STORED", "STRICT", "SUBPARTITION", "SUBPARTITIONS",
    "SUBSTRING", "SUCCESSFUL", "SUSPEND", "SWITCHOVER", "SYNC", "SYSAUX", "SYSID", "SYSTEM",
    "T", "TABLESPACE", "TB", "TEMP", "TEMPFILE", "TEMPLATE", "TEMPORARY", "TERMINATED", "THAN",
    "TIMES", "TIMEZONE", "TINYINT", "TOAST", "TRACE", "TRACKING", "TRAIL", "TRAILING",
    "TRANSACTION", "TRANSACTIONAL", "TRANSFORMS", "TREAT", "TRIAL", "TRIGGER", "TRIGGERS",
    "TRIM", "TRUE", "TRUNCATE", "TRUSTED", "TUPLE", "TYPE", "UNBOUNDED", "UNCOMMITTED", "UNDO",
    "UNENCRYPTED", "UNKNOWN", "UNLIMITED", "UNLISTEN", "UNLOCK", "UNMAINTENANCE", "UNPIVOT",
    "UNSIGNED", "UNTIL", "UNUSABLE", "UP", "UPDATE", "UPDATELABEL", "UPDATEXML", "USAGE",
    "USE", "USER", "UTF8", "UTF8MB4", "VACUUM", "VALID", "VALIDATE", "VALIDATION", "VALIDATOR",
    "VALUE", "VALUES", "VARBINARY", "VARBIT", "VARCHAR", "VARCHAR2", "VARYING", "VERBOSE",
    "VERSION", "VERSIONS", "VIEW", "VIRTUAL", "VISIBLE", "VOLATILE", "VOTEDISK", "WAIT",
    "WALLET", "WEIGHT", "WHEN", "WHENEVER", "WINDOW", "WORK", "XML", "XMLATTRIBUTES",
    "XMLCONCAT", "XMLELEMENT", "XMLFOREST", "XMLPARSE", "XMLPI", "XMLROOT", "XMLSERIALIZE",
    "XMLTABLE", "YEAR", "YES", "ZONE",
];

static KEYWORDS: LazyLock<KeywordSet> = LazyLock::new(|| KeywordSet::new(OSCAR_KEYWORDS));

#[derive(Debug, Default, Clone, Copy)]
pub struct OscarIdentifierPolicy;

impl IdentifierPolicy for OscarIdentifierPolicy {
    fn dialect(&self) -> &'static str {
        "oscar"
    }

    fn escape_symbol(&self) -> EscapeSymbol {
        EscapeSymbol::DOUBLE_QUOTE
    }

    fn case_folding(&self) -> CaseFolding {
        CaseFolding::Upper
    }

    fn keywords(&self) -> &KeywordSet {
        &KEYWORDS
    }
}
