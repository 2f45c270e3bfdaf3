//! Built-in demo content: knowledge entries, fallback answer and document catalog

use crate::types::{ChatAnswer, DocumentInfo, KnowledgeEntry, SourceCitation};
use chrono::{TimeZone, Utc};

/// Generation model reported by the demo health probe
pub const DEMO_LLM_MODEL: &str = "phi3:mini";

/// Embedding model reported by the demo health probe
pub const DEMO_EMBEDDING_MODEL: &str = "all-minilm:l6-v2";

/// Processing time reported by the demo indexer, seconds
pub const DEMO_PROCESSING_TIME_SECS: f64 = 2.847;

/// Folder prefilled in the UI when running in demo mode
pub const DEMO_DEFAULT_FOLDER: &str = "~/Documents/Research";

fn cite(filename: &str, relevance_score: f64, page_number: Option<u32>) -> SourceCitation {
    SourceCitation::new(filename, relevance_score, page_number)
}

/// Keyword entries in match order
pub fn knowledge_entries() -> Vec<KnowledgeEntry> {
    vec![
        KnowledgeEntry::new(
            &["machine learning", "ml", "what is machine learning"],
            "**Machine learning** is a subset of artificial intelligence that enables systems to learn and improve from experience without being explicitly programmed.\n\nBased on the indexed documents, there are three main types:\n\n1. **Supervised Learning** - Uses labeled training data to learn a mapping function\n2. **Unsupervised Learning** - Finds hidden patterns in data without labels\n3. **Reinforcement Learning** - Learns through trial and error with rewards\n\nThe documents also highlight that feature engineering and data quality are critical factors in ML model performance.",
            vec![
                cite("Machine_Learning_Basics.pdf", 0.94, Some(3)),
                cite("Neural_Networks_Overview.txt", 0.78, None),
            ],
        ),
        KnowledgeEntry::new(
            &["rag", "retrieval augmented", "retrieval-augmented generation"],
            "**Retrieval-Augmented Generation (RAG)** is a technique that enhances LLM responses by grounding them in relevant retrieved documents.\n\nThe RAG pipeline works in several stages:\n\n1. **Document Ingestion** - Documents are split into chunks and converted to vector embeddings\n2. **Vector Storage** - Embeddings are stored in a vector database (e.g., ChromaDB)\n3. **Retrieval** - When a query arrives, the most relevant chunks are retrieved using similarity search\n4. **Generation** - The LLM generates a response using the retrieved context\n\nThis approach significantly reduces hallucinations and provides traceable source citations for every answer.",
            vec![
                cite("RAG_Architecture_Guide.pdf", 0.97, Some(1)),
                cite("Machine_Learning_Basics.pdf", 0.65, Some(12)),
            ],
        ),
        KnowledgeEntry::new(
            &["python", "best practice", "coding standard", "code quality"],
            "Based on the indexed documents, here are the key **Python best practices**:\n\n1. **Use virtual environments** - Isolate project dependencies with `venv` or `conda`\n2. **Follow PEP 8** - Consistent code formatting improves readability\n3. **Type hints** - Add type annotations for better IDE support and documentation\n4. **Error handling** - Use specific exception types rather than bare `except`\n5. **Testing** - Write unit tests with `pytest` and aim for meaningful coverage\n6. **Documentation** - Use docstrings for public APIs and keep README files updated\n\nThe document also recommends using tools like `black` for formatting and `ruff` for linting.",
            vec![
                cite("Python_Best_Practices.md", 0.96, None),
                cite("Data_Preprocessing_Pipeline.py", 0.52, None),
            ],
        ),
        KnowledgeEntry::new(
            &["neural network", "deep learning", "layers", "neuron"],
            "**Neural networks** are computing systems inspired by biological neural networks in the brain.\n\nKey concepts from the indexed documents:\n\n- **Layers**: Input layer, hidden layers, and output layer form the network architecture\n- **Activation Functions**: ReLU, sigmoid, and softmax introduce non-linearity\n- **Backpropagation**: The algorithm used to train neural networks by computing gradients\n- **Loss Functions**: Measure how far predictions are from actual values\n\nDeep learning refers to neural networks with multiple hidden layers, enabling them to learn hierarchical representations of data. Common architectures include CNNs for images and Transformers for text.",
            vec![
                cite("Neural_Networks_Overview.txt", 0.95, None),
                cite("Machine_Learning_Basics.pdf", 0.72, Some(8)),
            ],
        ),
        KnowledgeEntry::new(
            &["data", "preprocessing", "clean", "pipeline", "transform"],
            "**Data preprocessing** is a crucial step in any machine learning pipeline. The indexed documents describe several key stages:\n\n1. **Data Cleaning** - Handle missing values, remove duplicates, fix inconsistencies\n2. **Feature Scaling** - Normalize or standardize numerical features\n3. **Encoding** - Convert categorical variables using one-hot or label encoding\n4. **Feature Selection** - Remove irrelevant or redundant features\n5. **Train/Test Split** - Divide data into training and evaluation sets\n\nThe Python preprocessing pipeline in the codebase uses `pandas` for data manipulation and `scikit-learn` for transformations like `StandardScaler` and `LabelEncoder`.",
            vec![
                cite("Data_Preprocessing_Pipeline.py", 0.93, None),
                cite("Machine_Learning_Basics.pdf", 0.68, Some(15)),
            ],
        ),
        KnowledgeEntry::new(
            &["embedding", "vector", "similarity", "chromadb", "vector database"],
            "**Vector embeddings** are numerical representations of text that capture semantic meaning. In this system:\n\n- **Embedding Model**: `all-minilm:l6-v2` converts text chunks into 384-dimensional vectors\n- **Vector Store**: ChromaDB stores and indexes these vectors for fast similarity search\n- **Similarity Search**: When you ask a question, your query is embedded and compared against stored vectors using cosine similarity\n\nThe top-k most similar chunks are retrieved and passed to the LLM as context. This ensures responses are grounded in your actual documents rather than the model's general training data.",
            vec![
                cite("RAG_Architecture_Guide.pdf", 0.91, Some(5)),
                cite("Neural_Networks_Overview.txt", 0.58, None),
            ],
        ),
        KnowledgeEntry::new(
            &["hello", "hi", "hey", "help", "what can you do"],
            "Hello! I'm your document assistant powered by RAG (Retrieval-Augmented Generation).\n\nI can help you with questions about the indexed documents. Here are some things you can ask:\n\n- \"What is machine learning?\"\n- \"Explain the RAG architecture\"\n- \"What are Python best practices?\"\n- \"How do neural networks work?\"\n- \"What is data preprocessing?\"\n- \"How do vector embeddings work?\"\n\nAll my responses are grounded in the documents that have been indexed, and I'll always show you which sources I referenced.",
            vec![
                cite("RAG_Architecture_Guide.pdf", 0.45, Some(1)),
                cite("Machine_Learning_Basics.pdf", 0.40, Some(1)),
            ],
        ),
    ]
}

/// Answer for queries that match no keyword
pub fn fallback_answer() -> ChatAnswer {
    ChatAnswer::new(
        "Based on the indexed documents, I found some related information but the query doesn't closely match any specific section.\n\nThis system uses **Retrieval-Augmented Generation (RAG)** to answer questions by:\n1. Converting your question into a vector embedding\n2. Finding the most similar document chunks in ChromaDB\n3. Passing those chunks as context to the LLM\n4. Generating a grounded response with source citations\n\nTry asking about specific topics covered in the documents, such as machine learning, neural networks, Python best practices, or data preprocessing.",
        vec![
            cite("RAG_Architecture_Guide.pdf", 0.42, Some(2)),
            cite("Machine_Learning_Basics.pdf", 0.35, Some(1)),
        ],
    )
}

fn document(
    filename: &str,
    file_type: &str,
    chunk_count: u64,
    file_size: u64,
    indexed_second: u32,
) -> DocumentInfo {
    DocumentInfo {
        filename: filename.to_string(),
        file_type: file_type.to_string(),
        chunk_count,
        file_size: Some(file_size),
        indexed_at: Utc
            .with_ymd_and_hms(2025, 10, 15, 9, 30, indexed_second)
            .single(),
    }
}

/// Pre-indexed sample documents
pub fn sample_documents() -> Vec<DocumentInfo> {
    vec![
        document("Machine_Learning_Basics.pdf", "pdf", 24, 2_457_600, 0),
        document("Python_Best_Practices.md", "md", 18, 45_200, 5),
        document("RAG_Architecture_Guide.pdf", "pdf", 31, 3_145_728, 12),
        document("Neural_Networks_Overview.txt", "txt", 12, 28_400, 15),
        document("Data_Preprocessing_Pipeline.py", "py", 8, 15_600, 18),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_documents() {
        let docs = sample_documents();
        assert_eq!(docs.len(), 5);
        assert_eq!(docs.iter().map(|d| d.chunk_count).sum::<u64>(), 93);
        assert!(docs.iter().all(|d| d.indexed_at.is_some()));
    }

    #[test]
    fn test_every_cited_file_is_in_the_catalog() {
        let catalog: Vec<String> = sample_documents().into_iter().map(|d| d.filename).collect();
        let cited = knowledge_entries()
            .into_iter()
            .flat_map(|e| e.sources)
            .chain(fallback_answer().sources);
        for citation in cited {
            assert!(catalog.contains(&citation.filename), "{}", citation.filename);
        }
    }
}
